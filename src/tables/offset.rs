use std::io::{self, Cursor};

use super::FontTable;
use byteorder::{BigEndian, ReadBytesExt};

/// This table contains a dictionary of all font tables included in the file.
/// See spec:
/// - https://docs.microsoft.com/en-us/typography/opentype/spec/otff
/// - https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6.html
#[derive(Debug, PartialEq)]
pub struct OffsetTable {
    /// Table records of the font, in directory order.
    pub(crate) tables: Vec<TableRecord>,
}

impl OffsetTable {
    pub fn unpack<R: io::Read>(mut rd: &mut R) -> Result<Self, io::Error> {
        // sfnt version; TrueType outlines use 0x00010000, but the value does
        // not influence decoding and CFF containers fail later on the missing
        // glyf table, so it is not validated here
        rd.read_u32::<BigEndian>()?;
        let num_tables = rd.read_u16::<BigEndian>()?;
        // search_range, entry_selector and range_shift only matter for
        // binary searching the directory in-place
        for _ in 0..3 {
            rd.read_u16::<BigEndian>()?;
        }

        let mut tables = Vec::with_capacity(num_tables.min(64) as usize);
        for _ in 0..num_tables {
            tables.push(TableRecord::unpack(&mut rd)?);
        }

        Ok(OffsetTable { tables })
    }

    pub fn get_table_record(&self, tag: &str) -> Option<&TableRecord> {
        // directory order is not guaranteed in the wild, so no binary search
        self.tables.iter().find(|r| r.tag == tag)
    }

    /// Unpack the table `T`, handing the parser a cursor over exactly the
    /// byte range the directory declares for it. Returns `None` if the table
    /// is absent; a range outside the input fails as truncated.
    pub fn unpack_table<'a, T, R>(
        &self,
        dep: T::Dep,
        cursor: &Cursor<R>,
    ) -> Result<Option<T>, io::Error>
    where
        R: io::Read + AsRef<[u8]>,
        T: FontTable<'a>,
    {
        let record = match self.get_table_record(T::name()) {
            Some(record) => record,
            None => return Ok(None),
        };

        let data = cursor.get_ref().as_ref();
        let start = record.offset as usize;
        let table_data = start
            .checked_add(record.length as usize)
            .and_then(|end| data.get(start..end))
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("{} table extends beyond the end of the input", record.tag),
                )
            })?;

        let mut rd = Cursor::new(table_data);
        Ok(Some(T::unpack(&mut rd, dep)?))
    }
}

#[derive(Debug, PartialEq)]
pub struct TableRecord {
    pub(crate) tag: String,
    /// Byte offset from the beginning of the file.
    pub(crate) offset: u32,
    pub(crate) length: u32,
}

impl TableRecord {
    fn unpack<R: io::Read>(rd: &mut R) -> Result<Self, io::Error> {
        let mut tag = [0; 4];
        rd.read_exact(&mut tag)?;
        let tag = String::from_utf8_lossy(&tag).to_string();
        // the checksum is not verified
        rd.read_u32::<BigEndian>()?;
        Ok(TableRecord {
            tag,
            offset: rd.read_u32::<BigEndian>()?,
            length: rd.read_u32::<BigEndian>()?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Write;

    fn directory(entries: &[(&str, u32, u32)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.write_u32::<BigEndian>(0x00010000).unwrap();
        data.write_u16::<BigEndian>(entries.len() as u16).unwrap();
        data.write_u16::<BigEndian>(0).unwrap(); // search_range
        data.write_u16::<BigEndian>(0).unwrap(); // entry_selector
        data.write_u16::<BigEndian>(0).unwrap(); // range_shift
        for (tag, offset, length) in entries {
            data.write_all(tag.as_bytes()).unwrap();
            data.write_u32::<BigEndian>(0).unwrap(); // checksum
            data.write_u32::<BigEndian>(*offset).unwrap();
            data.write_u32::<BigEndian>(*length).unwrap();
        }
        data
    }

    #[test]
    fn test_offset_table_decode() {
        let data = directory(&[("glyf", 44, 120), ("head", 28, 16)]);
        let table = OffsetTable::unpack(&mut Cursor::new(&data[..])).unwrap();

        assert_eq!(table.tables.len(), 2);
        assert_eq!(
            table.get_table_record("head"),
            Some(&TableRecord {
                tag: "head".to_string(),
                offset: 28,
                length: 16,
            })
        );
        assert_eq!(table.get_table_record("loca"), None);
    }

    #[test]
    fn test_out_of_bounds_table_record() {
        let data = directory(&[("head", 4096, 16)]);
        let cursor = Cursor::new(&data[..]);
        let table = OffsetTable::unpack(&mut cursor.clone()).unwrap();

        let result: Result<Option<crate::tables::head::HeadTable>, _> =
            table.unpack_table((), &cursor);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_truncated_directory() {
        let mut data = directory(&[("head", 28, 16)]);
        data.truncate(20);
        let err = OffsetTable::unpack(&mut Cursor::new(&data[..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
