use std::io::{self, Cursor};

use super::FontTable;
use byteorder::{BigEndian, ReadBytesExt};
use log::warn;

/// Name IDs 0..=24 cover the predefined entries (copyright, family, subfamily,
/// full name, ...); only those are projected into `strings`.
pub const NAME_STRING_COUNT: usize = 25;

/// This table includes human-readable names for the font: copyright notices,
/// font and style names, and other information.
/// See spec:
/// - https://docs.microsoft.com/en-us/typography/opentype/spec/name
/// - https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6name.html
#[derive(Debug, PartialEq, Clone)]
pub struct NameTable {
    /// All parsed records with their raw string bytes.
    pub(crate) records: Vec<NameRecord>,
    /// Predefined name strings indexed by name ID, projected onto Latin-1.
    /// Missing entries are empty.
    pub(crate) strings: [String; NAME_STRING_COUNT],
}

/// A single name record. `string` holds the raw storage bytes in the record's
/// platform-specific encoding, so callers that need more than the Latin-1
/// projection can decode it themselves.
#[derive(Debug, PartialEq, Clone)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub string: Vec<u8>,
}

impl<'a> FontTable<'a> for NameTable {
    type Dep = ();

    fn name() -> &'static str {
        "name"
    }

    fn unpack<R: io::Read + AsRef<[u8]>>(
        rd: &mut Cursor<R>,
        _: Self::Dep,
    ) -> Result<Self, io::Error> {
        // format 1 only appends language-tag records after the name records,
        // so both formats decode the same way here
        rd.read_u16::<BigEndian>()?;
        let count = rd.read_u16::<BigEndian>()?;
        let string_offset = rd.read_u16::<BigEndian>()? as usize;

        let mut headers = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let platform_id = rd.read_u16::<BigEndian>()?;
            let encoding_id = rd.read_u16::<BigEndian>()?;
            let language_id = rd.read_u16::<BigEndian>()?;
            let name_id = rd.read_u16::<BigEndian>()?;
            let length = rd.read_u16::<BigEndian>()? as usize;
            let offset = rd.read_u16::<BigEndian>()? as usize;
            headers.push((platform_id, encoding_id, language_id, name_id, length, offset));
        }

        let data = rd.get_ref().as_ref();
        let mut records = Vec::with_capacity(headers.len());
        let mut strings: [String; NAME_STRING_COUNT] = Default::default();
        for (platform_id, encoding_id, language_id, name_id, length, offset) in headers {
            let start = string_offset + offset;
            let string = match data.get(start..start + length) {
                Some(bytes) => bytes.to_vec(),
                None => {
                    warn!("name record {} points outside the name table, skipping", name_id);
                    continue;
                }
            };

            if (name_id as usize) < NAME_STRING_COUNT {
                strings[name_id as usize] = project_latin1(&string);
            }
            records.push(NameRecord {
                platform_id,
                encoding_id,
                language_id,
                name_id,
                string,
            });
        }

        Ok(NameTable { records, strings })
    }
}

/// Project raw name bytes onto a Latin-1 string. A leading zero byte marks a
/// UTF-16BE string, of which only the low byte of each unit is kept; anything
/// else is taken as Latin-1 as-is. Lossy for names outside Latin-1; the raw
/// bytes stay available on the record.
fn project_latin1(bytes: &[u8]) -> String {
    if bytes.first() == Some(&0) {
        bytes.iter().skip(1).step_by(2).map(|&b| char::from(b)).collect()
    } else {
        bytes.iter().map(|&b| char::from(b)).collect()
    }
}
