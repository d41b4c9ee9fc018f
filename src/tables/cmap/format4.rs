use std::io;

use byteorder::{BigEndian, ReadBytesExt};

/// The segment-mapped cmap subtable for the Unicode BMP. Character ranges are
/// described by parallel arrays of segments; each segment either derives its
/// glyph ids arithmetically (`id_delta`) or indexes into the trailing glyph
/// id array (`id_range_offset`).
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct Format4 {
    /// End character code for each segment, last = 0xFFFF.
    end_code: Vec<u16>,
    /// Start character code for each segment.
    start_code: Vec<u16>,
    /// Delta for all character codes in segment.
    id_delta: Vec<i16>,
    /// Offsets into glyph_id_array or 0.
    id_range_offset: Vec<u16>,
    /// Glyph index array (arbitrary length).
    glyph_id_array: Vec<u8>,
}

impl Format4 {
    /// Expects the reader to be positioned after the subtable's format and
    /// length words and limited to the subtable's extent.
    pub fn unpack<R: io::Read>(rd: &mut R) -> Result<Self, io::Error> {
        rd.read_u16::<BigEndian>()?; // language
        let seg_count = (rd.read_u16::<BigEndian>()? / 2) as usize;
        rd.read_u16::<BigEndian>()?; // search_range
        rd.read_u16::<BigEndian>()?; // entry_selector
        rd.read_u16::<BigEndian>()?; // range_shift
        let mut end_code = vec![0; seg_count];
        rd.read_u16_into::<BigEndian>(&mut end_code)?;
        rd.read_u16::<BigEndian>()?; // reserved_pad
        let mut start_code = vec![0; seg_count];
        rd.read_u16_into::<BigEndian>(&mut start_code)?;
        let mut id_delta = vec![0; seg_count];
        rd.read_i16_into::<BigEndian>(&mut id_delta)?;
        let mut id_range_offset = vec![0; seg_count];
        rd.read_u16_into::<BigEndian>(&mut id_range_offset)?;

        let mut glyph_id_array = Vec::new();
        rd.read_to_end(&mut glyph_id_array)?;

        Ok(Format4 {
            end_code,
            start_code,
            id_delta,
            id_range_offset,
            glyph_id_array,
        })
    }

    /// Every `(code point, glyph id)` pair of the subtable, in segment order
    /// and code point order within a segment. This iteration order is part of
    /// the contract: when several code points map to the same glyph, the last
    /// pair decides the glyph's reverse mapping.
    pub fn mappings(&self) -> Vec<(u32, u16)> {
        let mut out = Vec::new();
        for segment in 0..self.end_code.len() {
            let start = self.start_code[segment];
            let end = self.end_code[segment];
            if start > end {
                continue;
            }
            for codepoint in start as u32..=end as u32 {
                let glyph_id = if self.id_range_offset[segment] == 0 {
                    (codepoint as u16).wrapping_add(self.id_delta[segment] as u16)
                } else {
                    match self.raw_glyph_id(segment, codepoint as u16) {
                        Some(raw) => raw.wrapping_add(self.id_delta[segment] as u16),
                        None => continue,
                    }
                };
                out.push((codepoint, glyph_id));
            }
        }
        out
    }

    /// Resolves the glyph id array lookup for a segment with a non-zero
    /// range offset. The offset is relative to the segment's own position
    /// inside `id_range_offset`, so it can address both the remainder of that
    /// array and the trailing `glyph_id_array`.
    fn raw_glyph_id(&self, segment: usize, codepoint: u16) -> Option<u16> {
        let pos = (self.id_range_offset[segment] as usize)
            + 2 * (codepoint.checked_sub(self.start_code[segment])? as usize)
            + 2 * segment;

        if pos / 2 < self.id_range_offset.len() {
            self.id_range_offset.get(pos / 2).copied()
        } else {
            let offset = pos - self.id_range_offset.len() * 2;
            let mut bytes = self.glyph_id_array.get(offset..)?;
            bytes.read_u16::<BigEndian>().ok()
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Cursor;

    /// Builds a complete format 4 subtable (including format and length
    /// words) from `(start, end, id_delta)` segments; the required final
    /// 0xFFFF segment is appended automatically.
    pub(crate) fn format4_data(segments: &[(u16, u16, i16)]) -> Vec<u8> {
        let seg_count = segments.len() + 1;
        let length = 16 + 8 * seg_count;

        let mut data = Vec::new();
        data.write_u16::<BigEndian>(4).unwrap(); // format
        data.write_u16::<BigEndian>(length as u16).unwrap();
        data.write_u16::<BigEndian>(0).unwrap(); // language
        data.write_u16::<BigEndian>(seg_count as u16 * 2).unwrap();
        data.write_u16::<BigEndian>(0).unwrap(); // search_range
        data.write_u16::<BigEndian>(0).unwrap(); // entry_selector
        data.write_u16::<BigEndian>(0).unwrap(); // range_shift
        for (_, end, _) in segments {
            data.write_u16::<BigEndian>(*end).unwrap();
        }
        data.write_u16::<BigEndian>(0xFFFF).unwrap();
        data.write_u16::<BigEndian>(0).unwrap(); // reserved_pad
        for (start, _, _) in segments {
            data.write_u16::<BigEndian>(*start).unwrap();
        }
        data.write_u16::<BigEndian>(0xFFFF).unwrap();
        for (_, _, delta) in segments {
            data.write_i16::<BigEndian>(*delta).unwrap();
        }
        data.write_i16::<BigEndian>(1).unwrap();
        for _ in 0..seg_count {
            data.write_u16::<BigEndian>(0).unwrap(); // id_range_offset
        }
        data
    }

    fn unpack(data: &[u8]) -> Format4 {
        // skip the format and length words, as the table parser does
        Format4::unpack(&mut Cursor::new(&data[4..])).unwrap()
    }

    #[test]
    fn test_format4_delta_segments() {
        let format4 = unpack(&format4_data(&[(10, 12, -9), (30, 31, -18)]));
        assert_eq!(
            format4.mappings(),
            vec![
                (10, 1),
                (11, 2),
                (12, 3),
                (30, 12),
                (31, 13),
                // the final segment maps 0xFFFF through its delta of 1
                (0xFFFF, 0),
            ]
        );
    }

    #[test]
    fn test_format4_range_offset_segments() {
        // one real segment (10..=12) resolved through glyph_id_array, plus
        // the required end segment
        let mut data = Vec::new();
        data.write_u16::<BigEndian>(0).unwrap(); // language
        data.write_u16::<BigEndian>(4).unwrap(); // seg_count_x2
        data.write_u16::<BigEndian>(0).unwrap(); // search_range
        data.write_u16::<BigEndian>(0).unwrap(); // entry_selector
        data.write_u16::<BigEndian>(0).unwrap(); // range_shift
        for end in &[12u16, 0xFFFF] {
            data.write_u16::<BigEndian>(*end).unwrap();
        }
        data.write_u16::<BigEndian>(0).unwrap(); // reserved_pad
        for start in &[10u16, 0xFFFF] {
            data.write_u16::<BigEndian>(*start).unwrap();
        }
        for delta in &[0i16, 1] {
            data.write_i16::<BigEndian>(*delta).unwrap();
        }
        // segment 0 points 4 bytes ahead of &id_range_offset[0], which is
        // the start of glyph_id_array
        for range_offset in &[4u16, 0] {
            data.write_u16::<BigEndian>(*range_offset).unwrap();
        }
        for glyph_id in &[7u16, 8, 9] {
            data.write_u16::<BigEndian>(*glyph_id).unwrap();
        }

        let format4 = Format4::unpack(&mut Cursor::new(&data[..])).unwrap();
        assert_eq!(
            format4.mappings(),
            vec![(10, 7), (11, 8), (12, 9), (0xFFFF, 0)]
        );
    }

    #[test]
    fn test_format4_range_offset_with_delta() {
        // like above, but the array value is still offset by id_delta
        let mut data = Vec::new();
        data.write_u16::<BigEndian>(0).unwrap();
        data.write_u16::<BigEndian>(4).unwrap();
        for _ in 0..3 {
            data.write_u16::<BigEndian>(0).unwrap();
        }
        for end in &[10u16, 0xFFFF] {
            data.write_u16::<BigEndian>(*end).unwrap();
        }
        data.write_u16::<BigEndian>(0).unwrap();
        for start in &[10u16, 0xFFFF] {
            data.write_u16::<BigEndian>(*start).unwrap();
        }
        for delta in &[100i16, 1] {
            data.write_i16::<BigEndian>(*delta).unwrap();
        }
        for range_offset in &[4u16, 0] {
            data.write_u16::<BigEndian>(*range_offset).unwrap();
        }
        data.write_u16::<BigEndian>(7).unwrap();

        let format4 = Format4::unpack(&mut Cursor::new(&data[..])).unwrap();
        assert_eq!(format4.mappings(), vec![(10, 107), (0xFFFF, 0)]);
    }

    #[test]
    fn test_format4_truncated() {
        let data = format4_data(&[(10, 12, 0)]);
        let err = Format4::unpack(&mut Cursor::new(&data[4..20])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
