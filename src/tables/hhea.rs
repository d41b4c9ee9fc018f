use std::io::{self, Cursor};

use super::FontTable;
use byteorder::{BigEndian, ReadBytesExt};

/// This table contains information for horizontal layout. The caret and
/// extent fields have no bearing on glyph geometry and are discarded.
/// See spec:
/// - https://docs.microsoft.com/en-us/typography/opentype/spec/hhea
/// - https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6hhea.html
#[derive(Debug, PartialEq, Clone)]
pub struct HheaTable {
    /// Distance from baseline of highest ascender.
    pub(crate) ascender: i16,
    /// Distance from baseline of lowest descender.
    pub(crate) descender: i16,
    /// Typographic line gap.
    pub(crate) line_gap: i16,
    /// Number of hMetric entries in the 'hmtx' table.
    pub(crate) number_of_h_metrics: u16,
}

impl<'a> FontTable<'a> for HheaTable {
    type Dep = ();

    fn name() -> &'static str {
        "hhea"
    }

    fn unpack<R: io::Read + AsRef<[u8]>>(
        rd: &mut Cursor<R>,
        _: Self::Dep,
    ) -> Result<Self, io::Error> {
        rd.read_u16::<BigEndian>()?; // major_version
        rd.read_u16::<BigEndian>()?; // minor_version
        let ascender = rd.read_i16::<BigEndian>()?;
        let descender = rd.read_i16::<BigEndian>()?;
        let line_gap = rd.read_i16::<BigEndian>()?;
        rd.read_u16::<BigEndian>()?; // advance_width_max
        rd.read_i16::<BigEndian>()?; // min_left_side_bearing
        rd.read_i16::<BigEndian>()?; // min_right_side_bearing
        rd.read_i16::<BigEndian>()?; // x_max_extent
        rd.read_i16::<BigEndian>()?; // caret_slope_rise
        rd.read_i16::<BigEndian>()?; // caret_slope_run
        rd.read_i16::<BigEndian>()?; // caret_offset
        // 4 times reserved
        for _ in 0..4 {
            rd.read_i16::<BigEndian>()?;
        }
        rd.read_i16::<BigEndian>()?; // metric_data_format

        Ok(HheaTable {
            ascender,
            descender,
            line_gap,
            number_of_h_metrics: rd.read_u16::<BigEndian>()?,
        })
    }
}
