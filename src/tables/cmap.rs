pub(crate) mod format4;

use std::io::{self, Cursor};

use super::FontTable;
use byteorder::{BigEndian, ReadBytesExt};
pub(crate) use format4::Format4;
use log::warn;

/// A font's cmap table, which defines the mapping of character codes to glyph
/// ids. The first encoding record with one of the supported character
/// encodings is used:
///
/// | platform ID | encoding ID |                              |
/// |-------------|-------------|------------------------------|
/// | 0           | 3           | Unicode >= 2.0, BMP only     |
/// | 3           | 1           | Windows, Unicode BMP         |
///
/// Only subtable format 4 is supported. Records with other encodings or
/// formats are skipped; a font without a single usable subtable still parses,
/// it just maps no characters.
///
/// See OpenType spec: https://docs.microsoft.com/en-us/typography/opentype/spec/cmap
#[derive(Debug, PartialEq, Clone)]
pub struct CmapTable {
    pub(crate) subtable: Option<Format4>,
}

impl<'a> FontTable<'a> for CmapTable {
    type Dep = ();

    fn name() -> &'static str {
        "cmap"
    }

    fn unpack<R: io::Read + AsRef<[u8]>>(
        rd: &mut Cursor<R>,
        _: Self::Dep,
    ) -> Result<Self, io::Error> {
        rd.read_u16::<BigEndian>()?; // version
        let num_tables = rd.read_u16::<BigEndian>()?;

        let mut records = Vec::with_capacity(num_tables.min(8) as usize);
        for _ in 0..num_tables {
            records.push(EncodingRecord::unpack(rd)?);
        }

        let data = rd.get_ref().as_ref();
        let mut subtable = None;
        for record in &records {
            if !matches!((record.platform_id, record.encoding_id), (0, 3) | (3, 1)) {
                continue;
            }
            match subtable_at(data, record) {
                Ok(Some(format4)) => {
                    subtable = Some(format4);
                    break;
                }
                Ok(None) => continue,
                Err(err) => {
                    warn!(
                        "broken cmap subtable for platform {} encoding {}: {}",
                        record.platform_id, record.encoding_id, err
                    );
                    continue;
                }
            }
        }

        if subtable.is_none() {
            warn!("no supported cmap subtable found, continuing without a character map");
        }

        Ok(CmapTable { subtable })
    }
}

/// Reads the subtable a record points to; `None` if its format is
/// unsupported.
fn subtable_at(data: &[u8], record: &EncodingRecord) -> Result<Option<Format4>, io::Error> {
    let start = record.offset as usize;
    let mut header = Cursor::new(data.get(start..).ok_or_else(|| {
        super::error(format!(
            "cmap subtable offset {} is outside the table",
            record.offset
        ))
    })?);

    let format = header.read_u16::<BigEndian>()?;
    if format != 4 {
        warn!("cmap subtable format {} is not supported, skipping", format);
        return Ok(None);
    }

    let length = header.read_u16::<BigEndian>()? as usize;
    // the length covers the format and length words themselves
    let subtable_data = data
        .get(start + 4..start + length)
        .ok_or_else(|| super::error(format!("cmap subtable length {} is out of range", length)))?;

    Format4::unpack(&mut Cursor::new(subtable_data)).map(Some)
}

#[derive(Debug, PartialEq, Clone)]
pub(crate) struct EncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    /// Byte offset from beginning of the cmap table to the subtable.
    offset: u32,
}

impl EncodingRecord {
    fn unpack<R: io::Read>(rd: &mut R) -> Result<Self, io::Error> {
        Ok(EncodingRecord {
            platform_id: rd.read_u16::<BigEndian>()?,
            encoding_id: rd.read_u16::<BigEndian>()?,
            offset: rd.read_u32::<BigEndian>()?,
        })
    }
}
