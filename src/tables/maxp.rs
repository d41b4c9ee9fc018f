use std::io::{self, Cursor};

use super::FontTable;
use byteorder::{BigEndian, ReadBytesExt};

/// This table establishes the memory requirements for the font; the decoder
/// uses it for the glyph count and the limits that bound glyph resolution.
/// See spec:
/// - https://docs.microsoft.com/en-us/typography/opentype/spec/maxp
/// - https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6maxp.html
#[derive(Debug, PartialEq, Clone)]
pub enum MaxpTable {
    // Version 0.5, used by fonts with CFF outlines.
    CFF(CffMaxpTable),
    // Version 1.0
    TrueType(TrueTypeMaxpTable),
}

#[derive(Debug, PartialEq, Clone)]
pub struct CffMaxpTable {
    /// The number of glyphs in the font.
    pub(crate) num_glyphs: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct TrueTypeMaxpTable {
    /// The number of glyphs in the font.
    pub(crate) num_glyphs: u16,
    /// Maximum contours in a non-composite glyph.
    pub(crate) max_contours: u16,
    /// Maximum levels of recursion; 1 for glyphs with simple components.
    pub(crate) max_component_depth: u16,
}

impl MaxpTable {
    pub fn num_glyphs(&self) -> u16 {
        match self {
            MaxpTable::CFF(table) => table.num_glyphs,
            MaxpTable::TrueType(table) => table.num_glyphs,
        }
    }

    pub(crate) fn max_contours(&self) -> u16 {
        match self {
            MaxpTable::CFF(_) => 0,
            MaxpTable::TrueType(table) => table.max_contours,
        }
    }

    pub(crate) fn max_component_depth(&self) -> u16 {
        match self {
            MaxpTable::CFF(_) => 0,
            MaxpTable::TrueType(table) => table.max_component_depth,
        }
    }
}

impl<'a> FontTable<'a> for MaxpTable {
    type Dep = ();

    fn name() -> &'static str {
        "maxp"
    }

    fn unpack<R: io::Read + AsRef<[u8]>>(
        rd: &mut Cursor<R>,
        _: Self::Dep,
    ) -> Result<Self, io::Error> {
        let version = rd.read_u32::<BigEndian>()?;
        match version {
            0x00005000 => Ok(MaxpTable::CFF(CffMaxpTable {
                num_glyphs: rd.read_u16::<BigEndian>()?,
            })),
            0x00010000 => {
                let num_glyphs = rd.read_u16::<BigEndian>()?;
                rd.read_u16::<BigEndian>()?; // max_points
                let max_contours = rd.read_u16::<BigEndian>()?;
                // max_component_points, max_component_contours, max_zones,
                // max_twilight_points, max_storage, max_function_defs,
                // max_instruction_defs, max_stack_elements,
                // max_size_of_instructions, max_component_elements
                for _ in 0..10 {
                    rd.read_u16::<BigEndian>()?;
                }
                let max_component_depth = rd.read_u16::<BigEndian>()?;

                Ok(MaxpTable::TrueType(TrueTypeMaxpTable {
                    num_glyphs,
                    max_contours,
                    max_component_depth,
                }))
            }
            _ => Err(super::error(format!("Invalid maxp version {:#010x}", version))),
        }
    }
}
