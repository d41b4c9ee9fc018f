use std::io::{self, Cursor};

use super::hhea::HheaTable;
use super::maxp::MaxpTable;
use super::FontTable;
use byteorder::{BigEndian, ReadBytesExt};

/// This table contains glyph metrics used for horizontal text layout.
/// See spec:
/// - https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx
/// - https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6hmtx.html
#[derive(Debug, PartialEq, Clone)]
pub struct HmtxTable {
    /// Paired advance width and left side bearing values, indexed by glyph ID.
    h_metrics: Vec<LongHorMetric>,
    /// Left side bearings for glyph IDs greater than or equal to
    /// numberOfHMetrics; those glyphs repeat the last advance width.
    left_side_bearings: Vec<i16>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct LongHorMetric {
    /// Advance width, in font design units.
    advance_width: u16,
    /// Glyph left side bearing, in font design units.
    lsb: i16,
}

impl LongHorMetric {
    fn unpack<R: io::Read>(rd: &mut R) -> Result<Self, io::Error> {
        Ok(LongHorMetric {
            advance_width: rd.read_u16::<BigEndian>()?,
            lsb: rd.read_i16::<BigEndian>()?,
        })
    }
}

impl HmtxTable {
    pub fn advance_width(&self, glyph_id: u16) -> u16 {
        self.h_metrics
            .get(glyph_id as usize)
            .or_else(|| self.h_metrics.last())
            .map(|m| m.advance_width)
            .unwrap_or(0)
    }

    pub fn left_side_bearing(&self, glyph_id: u16) -> i16 {
        let id = glyph_id as usize;
        match self.h_metrics.get(id) {
            Some(metric) => metric.lsb,
            None => self
                .left_side_bearings
                .get(id - self.h_metrics.len())
                .copied()
                .unwrap_or(0),
        }
    }
}

impl<'a> FontTable<'a> for HmtxTable {
    type Dep = (&'a HheaTable, &'a MaxpTable);

    fn name() -> &'static str {
        "hmtx"
    }

    fn unpack<R: io::Read + AsRef<[u8]>>(
        rd: &mut Cursor<R>,
        (hhea, maxp): Self::Dep,
    ) -> Result<Self, io::Error> {
        let mut h_metrics = Vec::with_capacity(hhea.number_of_h_metrics as usize);
        for _ in 0..hhea.number_of_h_metrics {
            h_metrics.push(LongHorMetric::unpack(rd)?);
        }

        let mut left_side_bearings = vec![
            0;
            maxp.num_glyphs()
                .saturating_sub(hhea.number_of_h_metrics) as usize
        ];
        rd.read_i16_into::<BigEndian>(&mut left_side_bearings)?;

        Ok(HmtxTable {
            h_metrics,
            left_side_bearings,
        })
    }
}
