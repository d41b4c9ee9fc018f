use std::collections::HashMap;
use std::io::{self, Cursor};

use super::FontTable;
use byteorder::{BigEndian, ReadBytesExt};
use log::warn;

/// The legacy kerning table, holding inter-glyph spacing adjustments. Only
/// the Windows flavor (table version 0) with format 0 subtables is decoded;
/// pairs from all format 0 subtables are merged, keyed `(left << 16) | right`.
/// Coverage bits are tolerated as-is since they do not change the format 0
/// data layout.
/// See spec:
/// - https://docs.microsoft.com/en-us/typography/opentype/spec/kern
/// - https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6kern.html
#[derive(Debug, PartialEq, Clone, Default)]
pub struct KernTable {
    pub(crate) pairs: HashMap<u32, i16>,
}

impl<'a> FontTable<'a> for KernTable {
    type Dep = ();

    fn name() -> &'static str {
        "kern"
    }

    fn unpack<R: io::Read + AsRef<[u8]>>(
        rd: &mut Cursor<R>,
        _: Self::Dep,
    ) -> Result<Self, io::Error> {
        let version = rd.read_u16::<BigEndian>()?;
        if version != 0 {
            warn!("kern table version {} is not supported, ignoring the table", version);
            return Ok(KernTable::default());
        }
        let num_subtables = rd.read_u16::<BigEndian>()?;

        let data = rd.get_ref().as_ref();
        let mut offset = rd.position() as usize;
        let mut pairs = HashMap::new();

        for index in 0..num_subtables {
            let mut sub = match data.get(offset..) {
                Some(sub_data) if sub_data.len() >= 4 => Cursor::new(sub_data),
                _ => break,
            };
            let sub_version = sub.read_u16::<BigEndian>()?;
            let sub_length = sub.read_u16::<BigEndian>()? as usize;

            if sub_version != 0 {
                warn!(
                    "kern subtable {} version {} is not supported, skipping",
                    index, sub_version
                );
            } else if let Err(err) = unpack_format0(&mut sub, &mut pairs) {
                warn!("kern subtable {} is broken, ignoring the rest: {}", index, err);
                break;
            }

            // advance by the declared subtable length so a subtable with
            // trailing data cannot desynchronize its successors
            if sub_length == 0 {
                break;
            }
            offset += sub_length;
        }

        Ok(KernTable { pairs })
    }
}

fn unpack_format0<R: io::Read>(
    rd: &mut R,
    pairs: &mut HashMap<u32, i16>,
) -> Result<(), io::Error> {
    rd.read_u16::<BigEndian>()?; // coverage
    let n_pairs = rd.read_u16::<BigEndian>()?;
    rd.read_u16::<BigEndian>()?; // search_range
    rd.read_u16::<BigEndian>()?; // entry_selector
    rd.read_u16::<BigEndian>()?; // range_shift

    for _ in 0..n_pairs {
        let left = rd.read_u16::<BigEndian>()?;
        let right = rd.read_u16::<BigEndian>()?;
        let value = rd.read_i16::<BigEndian>()?;
        pairs.insert((left as u32) << 16 | right as u32, value);
    }

    Ok(())
}
