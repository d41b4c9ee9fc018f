use std::io::{self, Cursor};

use super::FontTable;
use byteorder::{BigEndian, ReadBytesExt};

/// The font header. Only the fields that influence glyph decoding are kept;
/// the rest of the table (revision, timestamps, overall bounding box, style
/// bits) is parsed and discarded.
/// See spec:
/// - https://docs.microsoft.com/en-us/typography/opentype/spec/head
/// - https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6head.html
#[derive(Debug, PartialEq, Clone)]
pub struct HeadTable {
    /// Set to a value from 16 to 16384.
    pub(crate) units_per_em: u16,
    /// 0 for short offsets (Offset16), 1 for long (Offset32).
    pub(crate) index_to_loc_format: i16,
}

impl<'a> FontTable<'a> for HeadTable {
    type Dep = ();

    fn name() -> &'static str {
        "head"
    }

    fn unpack<R: io::Read + AsRef<[u8]>>(
        rd: &mut Cursor<R>,
        _: Self::Dep,
    ) -> Result<Self, io::Error> {
        rd.read_u16::<BigEndian>()?; // major_version
        rd.read_u16::<BigEndian>()?; // minor_version
        rd.read_u32::<BigEndian>()?; // font_revision
        rd.read_u32::<BigEndian>()?; // check_sum_adjustment
        rd.read_u32::<BigEndian>()?; // magic_number
        rd.read_u16::<BigEndian>()?; // flags
        let units_per_em = rd.read_u16::<BigEndian>()?;
        rd.read_i64::<BigEndian>()?; // created
        rd.read_i64::<BigEndian>()?; // modified
        // x_min, y_min, x_max, y_max
        for _ in 0..4 {
            rd.read_i16::<BigEndian>()?;
        }
        rd.read_u16::<BigEndian>()?; // mac_style
        rd.read_u16::<BigEndian>()?; // lowest_rec_ppem
        rd.read_i16::<BigEndian>()?; // font_direction_hint
        let index_to_loc_format = rd.read_i16::<BigEndian>()?;

        Ok(HeadTable {
            units_per_em,
            index_to_loc_format,
        })
    }
}
