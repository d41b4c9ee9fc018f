//! Decodes TrueType fonts into renderer-ready glyph geometry: per-glyph
//! contours as straight segments and quadratic Béziers, a character to glyph
//! id map, horizontal metrics and legacy kerning. Outlines come out the way a
//! triangle-fan rasterizer wants them, with an auxiliary fan segment
//! alongside every quadratic.
//!
//! Hinting instructions are skipped, not executed. CFF outlines, variable
//! fonts and the OpenType layout tables are out of scope.

mod geometry;
mod tables;

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Cursor};

pub use geometry::{Curve, Path, Point};
pub use tables::name::{NameRecord, NAME_STRING_COUNT};

use tables::cmap::CmapTable;
use tables::glyf::{GlyfTable, GlyphDecoder};
use tables::head::HeadTable;
use tables::hhea::HheaTable;
use tables::hmtx::HmtxTable;
use tables::kern::KernTable;
use tables::loca::LocaTable;
use tables::maxp::MaxpTable;
use tables::name::NameTable;
use tables::offset::OffsetTable;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reading the input failed for reasons outside the font data itself.
    #[error("failed to read font data")]
    Io(#[source] io::Error),
    /// The input ended in the middle of a structure, or a table points
    /// outside of it.
    #[error("unexpected end of font data")]
    TruncatedInput,
    /// A table required for glyph decoding is absent.
    #[error("{0} table missing")]
    MissingTable(&'static str),
    #[error("font does not contain any glyphs")]
    EmptyFont,
    /// A table exists but its content does not decode.
    #[error("malformed font: {0}")]
    Malformed(#[source] io::Error),
}

impl Error {
    /// The stable error enumerator handed to [`parse_file`] callbacks:
    /// `-1` for unavailable or truncated input, `-2` for a missing table or
    /// malformed font.
    pub fn code(&self) -> i8 {
        match self {
            Error::Io(_) | Error::TruncatedInput => -1,
            Error::MissingTable(_) | Error::EmptyFont | Error::Malformed(_) => -2,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::TruncatedInput,
            io::ErrorKind::Other => Error::Malformed(err),
            _ => Error::Io(err),
        }
    }
}

/// A single decoded glyph: its outline as closed curve paths plus the
/// metrics needed to place it.
#[derive(Debug, PartialEq, Clone)]
pub struct Glyph {
    /// A Unicode code point mapping to this glyph, 0 if none does. When
    /// several do, the last one in cmap segment order wins.
    pub character: u32,
    pub glyph_index: u16,
    /// Straight from the glyph header: non-negative for simple glyphs,
    /// negative for composites.
    pub num_contours: i16,
    /// One path per contour; for composites, the transformed paths of all
    /// resolved components in file order.
    pub path_list: Vec<Path>,
    /// Horizontal advance in design units.
    pub advance_width: u16,
    /// Left side bearing in design units.
    pub left_side_bearing: i16,
    /// xMin, yMin, xMax, yMax as stored in the glyph header.
    pub bounding_box: [i16; 4],
    /// Total curve count over all paths; each curve corresponds to one
    /// triangle of a fan around the glyph center.
    pub num_triangles: u32,
}

/// Font-wide vertical metrics.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct FontMetaData {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}

/// Everything decoded from a font file. Owns all of its data; the input
/// buffer can be dropped once parsing returns.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct FontData {
    /// The predefined name strings (copyright, family, subfamily, ...)
    /// indexed by name ID, projected onto Latin-1. Missing entries are
    /// empty; see [`FontData::name_records`] for the raw bytes.
    pub name_strings: [String; NAME_STRING_COUNT],
    /// Family and subfamily name joined with a space.
    pub full_font_name: String,
    /// All name records with their raw, platform-encoded string bytes.
    pub name_records: Vec<NameRecord>,
    /// Unicode code point to glyph id, ordered by code point.
    pub glyph_map: BTreeMap<u32, u16>,
    /// All glyphs of the font, indexed by glyph id.
    pub glyphs: Vec<Glyph>,
    /// Kerning offsets keyed `(left glyph id << 16) | right glyph id`.
    pub kerning_table: HashMap<u32, i16>,
    pub meta_data: FontMetaData,
}

impl FontData {
    /// Decodes a complete TrueType font from a byte buffer.
    pub fn from_slice(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        parse_data(data.as_ref())
    }

    pub fn glyph(&self, glyph_id: u16) -> Option<&Glyph> {
        self.glyphs.get(glyph_id as usize)
    }

    pub fn glyph_for_char(&self, c: char) -> Option<&Glyph> {
        self.glyph_map
            .get(&(c as u32))
            .and_then(|&glyph_id| self.glyph(glyph_id))
    }

    /// The name string for a predefined name ID, if the font carries one.
    pub fn name(&self, name_id: u16) -> Option<&str> {
        self.name_strings
            .get(name_id as usize)
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
    }

    /// The kerning offset for a glyph pair, 0 if the font defines none.
    pub fn kerning_offset(&self, left_glyph: u16, right_glyph: u16) -> i16 {
        self.kerning_table
            .get(&((left_glyph as u32) << 16 | right_glyph as u32))
            .copied()
            .unwrap_or(0)
    }
}

/// Decodes a complete TrueType font from a byte buffer.
///
/// The glyph decoder is resilient: a single broken glyph (or composite
/// component) is left without an outline and logged, while the rest of the
/// font parses normally. Structural problems - a missing required table, a
/// truncated buffer, an empty font - fail the whole parse.
pub fn parse_data(data: &[u8]) -> Result<FontData, Error> {
    if data.is_empty() {
        return Err(Error::TruncatedInput);
    }

    let mut cursor = Cursor::new(data);
    let offset_table = OffsetTable::unpack(&mut cursor)?;

    let head_table: HeadTable = offset_table
        .unpack_table((), &cursor)?
        .ok_or(Error::MissingTable("head"))?;
    let maxp_table: MaxpTable = offset_table
        .unpack_table((), &cursor)?
        .ok_or(Error::MissingTable("maxp"))?;
    if maxp_table.num_glyphs() == 0 {
        return Err(Error::EmptyFont);
    }
    let name_table: NameTable = offset_table
        .unpack_table((), &cursor)?
        .ok_or(Error::MissingTable("name"))?;
    let hhea_table: HheaTable = offset_table
        .unpack_table((), &cursor)?
        .ok_or(Error::MissingTable("hhea"))?;
    let cmap_table: CmapTable = offset_table
        .unpack_table((), &cursor)?
        .ok_or(Error::MissingTable("cmap"))?;
    let loca_table: LocaTable = offset_table
        .unpack_table((&head_table, &maxp_table), &cursor)?
        .ok_or(Error::MissingTable("loca"))?;
    let hmtx_table: HmtxTable = offset_table
        .unpack_table((&hhea_table, &maxp_table), &cursor)?
        .ok_or(Error::MissingTable("hmtx"))?;
    let glyf_table: GlyfTable = offset_table
        .unpack_table(&loca_table, &cursor)?
        .ok_or(Error::MissingTable("glyf"))?;
    let kern_table: Option<KernTable> = offset_table.unpack_table((), &cursor)?;

    // forward and reverse character mappings; iteration order makes the last
    // code point of a multiply-mapped glyph its canonical character
    let mut glyph_map = BTreeMap::new();
    let mut reverse_map = HashMap::new();
    if let Some(subtable) = &cmap_table.subtable {
        for (codepoint, glyph_id) in subtable.mappings() {
            glyph_map.insert(codepoint, glyph_id);
            reverse_map.insert(glyph_id, codepoint);
        }
    }

    let decoder = GlyphDecoder::new(
        &glyf_table,
        &hmtx_table,
        &reverse_map,
        maxp_table.max_contours(),
        maxp_table.max_component_depth(),
    );
    let glyphs = decoder.decode_all();

    Ok(FontData {
        full_font_name: format!("{} {}", name_table.strings[1], name_table.strings[2]),
        name_strings: name_table.strings,
        name_records: name_table.records,
        glyph_map,
        glyphs,
        kerning_table: kern_table.map(|kern| kern.pairs).unwrap_or_default(),
        meta_data: FontMetaData {
            units_per_em: head_table.units_per_em,
            ascender: hhea_table.ascender,
            descender: hhea_table.descender,
            line_gap: hhea_table.line_gap,
        },
    })
}

/// Reads a font file and decodes it, reporting the outcome to `callback` as
/// `(args, font_data, code)` with code 0 on success, -1 for I/O or truncated
/// input and -2 for a missing table or malformed font. Returns the same
/// code. On failure the callback receives an empty [`FontData`].
pub fn parse_file<P, A, F>(path: P, callback: F, args: A) -> i8
where
    P: AsRef<std::path::Path>,
    F: FnOnce(A, FontData, i8),
{
    let (font_data, code) = match std::fs::read(path) {
        Ok(data) => match FontData::from_slice(data) {
            Ok(font_data) => (font_data, 0),
            Err(err) => (FontData::default(), err.code()),
        },
        Err(_) => (FontData::default(), -1),
    };

    callback(args, font_data, code);
    code
}

/// [`parse_file`] with an asynchronous file read; same callback contract.
#[cfg(feature = "async")]
pub async fn parse_file_async<P, A, F>(path: P, callback: F, args: A) -> i8
where
    P: AsRef<std::path::Path>,
    F: FnOnce(A, FontData, i8),
{
    let path: async_std::path::PathBuf = path.as_ref().to_path_buf().into();
    let (font_data, code) = match async_std::fs::read(&path).await {
        Ok(data) => match FontData::from_slice(data) {
            Ok(font_data) => (font_data, 0),
            Err(err) => (FontData::default(), err.code()),
        },
        Err(_) => (FontData::default(), -1),
    };

    callback(args, font_data, code);
    code
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tables::cmap::format4::test::format4_data;
    use crate::tables::cmap::test::cmap_data;
    use crate::tables::glyf::test::{composite_glyph_data, simple_glyph_data};
    use crate::tables::head::test::head_data;
    use crate::tables::hhea::test::hhea_data;
    use crate::tables::hmtx::test::hmtx_data;
    use crate::tables::kern::test::{kern_data, kern_subtable};
    use crate::tables::maxp::test::maxp_data;
    use crate::tables::name::test::name_data;
    use byteorder::{BigEndian, WriteBytesExt};
    use std::io::Write;

    fn build_font(tables: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.write_u32::<BigEndian>(0x00010000).unwrap();
        data.write_u16::<BigEndian>(tables.len() as u16).unwrap();
        data.write_u16::<BigEndian>(0).unwrap(); // search_range
        data.write_u16::<BigEndian>(0).unwrap(); // entry_selector
        data.write_u16::<BigEndian>(0).unwrap(); // range_shift

        let mut offset = 12 + tables.len() * 16;
        for (tag, table) in tables {
            data.write_all(tag.as_bytes()).unwrap();
            data.write_u32::<BigEndian>(0).unwrap(); // checksum
            data.write_u32::<BigEndian>(offset as u32).unwrap();
            data.write_u32::<BigEndian>(table.len() as u32).unwrap();
            offset += table.len();
        }
        for (_, table) in tables {
            data.write_all(table).unwrap();
        }
        data
    }

    const TRIANGLE: [(i16, i16, bool); 3] = [(0, 0, true), (100, 0, true), (50, 100, true)];

    /// A 9-glyph font exercising every decoder path:
    /// 0 empty, 1 on-curve triangle, 2 mixed on/off contour, 3 all-off-curve
    /// contour, 4 empty, 5/6 fillers, 7 component donor, 8 composite of 7.
    /// 'A'..='H' (65..=72) map to glyphs 1..=8.
    fn sample_font() -> Vec<u8> {
        let glyph_blocks: Vec<Vec<u8>> = vec![
            Vec::new(),
            simple_glyph_data([0, 0, 100, 100], &[&TRIANGLE]),
            simple_glyph_data(
                [0, 0, 100, 100],
                &[&[(0, 0, true), (100, 0, false), (100, 100, false), (0, 100, true)]],
            ),
            simple_glyph_data(
                [0, 0, 100, 100],
                &[&[(0, 0, false), (100, 0, false), (100, 100, false), (0, 100, false)]],
            ),
            Vec::new(),
            simple_glyph_data(
                [0, 0, 50, 50],
                &[&[(0, 0, true), (50, 0, true), (50, 50, true), (0, 50, true)]],
            ),
            simple_glyph_data([0, 0, 50, 50], &[&[(0, 0, true), (50, 0, true), (25, 50, true)]]),
            simple_glyph_data([0, 0, 100, 100], &[&TRIANGLE]),
            composite_glyph_data([10, 20, 60, 70], &[(7, 10, 20, Some(0.5))]),
        ];

        let mut glyf = Vec::new();
        let mut loca = Vec::new();
        loca.write_u32::<BigEndian>(0).unwrap();
        for block in &glyph_blocks {
            glyf.extend_from_slice(block);
            loca.write_u32::<BigEndian>(glyf.len() as u32).unwrap();
        }

        let regular_utf16 = [
            0u8, b'R', 0, b'e', 0, b'g', 0, b'u', 0, b'l', 0, b'a', 0, b'r',
        ];

        build_font(&[
            ("cmap", cmap_data(&[(3, 1, &format4_data(&[(65, 72, -64)]))])),
            ("glyf", glyf),
            ("head", head_data(1000, 1)),
            ("hhea", hhea_data(800, -200, 90, 6)),
            (
                "hmtx",
                hmtx_data(
                    &[(500, 10), (600, 12), (610, 14), (620, 16), (630, 18), (640, 20)],
                    &[7, 8, 9],
                ),
            ),
            (
                "kern",
                kern_data(&[kern_subtable(0, &[(65, 86, -80), (1, 2, -30)])]),
            ),
            ("loca", loca),
            ("maxp", maxp_data(9, 8, 2)),
            (
                "name",
                name_data(&[(1, 0, 1, b"Family"), (3, 1, 2, &regular_utf16)]),
            ),
        ])
    }

    fn sample() -> FontData {
        parse_data(&sample_font()).unwrap()
    }

    #[test]
    fn test_metadata_and_names() {
        let font = sample();
        assert_eq!(
            font.meta_data,
            FontMetaData {
                units_per_em: 1000,
                ascender: 800,
                descender: -200,
                line_gap: 90,
            }
        );
        assert_eq!(font.name(1), Some("Family"));
        assert_eq!(font.name(2), Some("Regular"));
        assert_eq!(font.name(3), None);
        assert_eq!(font.full_font_name, "Family Regular");
        assert_eq!(font.name_records.len(), 2);
        assert_eq!(font.name_records[1].platform_id, 3);
    }

    #[test]
    fn test_glyph_map_and_indices() {
        let font = sample();
        assert_eq!(font.glyphs.len(), 9);
        for c in 65..=72u32 {
            assert_eq!(font.glyph_map.get(&c), Some(&((c - 64) as u16)));
        }
        // every glyph knows its own id
        for (id, glyph) in font.glyphs.iter().enumerate() {
            assert_eq!(glyph.glyph_index, id as u16);
        }
        // every mapped glyph id resolves
        for (&c, &glyph_id) in &font.glyph_map {
            assert!(font.glyph(glyph_id).is_some(), "code point {} dangles", c);
        }
        assert_eq!(font.glyph_for_char('A').unwrap().glyph_index, 1);
        // reverse round trip: the stamped character maps back to the glyph
        for glyph in &font.glyphs {
            if glyph.character != 0 {
                assert_eq!(font.glyph_map.get(&glyph.character), Some(&glyph.glyph_index));
            }
        }
    }

    #[test]
    fn test_empty_glyph_keeps_metrics() {
        let font = sample();
        let glyph = font.glyph(4).unwrap();
        assert!(glyph.path_list.is_empty());
        assert_eq!(glyph.num_triangles, 0);
        assert_eq!(glyph.advance_width, 630);
        assert_eq!(glyph.left_side_bearing, 18);
        assert_eq!(glyph.character, 68);
    }

    #[test]
    fn test_straight_contour_glyph() {
        let font = sample();
        let glyph = font.glyph(1).unwrap();
        assert_eq!(glyph.num_contours, 1);
        assert_eq!(glyph.bounding_box, [0, 0, 100, 100]);
        assert_eq!(glyph.path_list.len(), 1);

        let curves = &glyph.path_list[0].curves;
        assert_eq!(curves.len(), 3);
        assert!(curves.iter().all(|c| !c.is_curve));
        assert_eq!(glyph.num_triangles, 3);
        assert_eq!(curves[2].end_point(), curves[0].p0);
    }

    #[test]
    fn test_implied_midpoint_between_off_curve_points() {
        let font = sample();
        let glyph = font.glyph(2).unwrap();
        let curves = &glyph.path_list[0].curves;
        assert_eq!(curves.len(), 5);
        assert_eq!(glyph.num_triangles, 5);

        let quads: Vec<&Curve> = curves.iter().filter(|c| c.is_curve).collect();
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].p2, Point::new(100.0, 50.0));
        assert_eq!(quads[1].p0, Point::new(100.0, 50.0));

        // the outline closes on the start of the first curve
        let last = curves.last().unwrap();
        assert_eq!(last.end_point(), Point::new(0.0, 0.0));
        assert_eq!(last.end_point(), curves[0].p0);
    }

    #[test]
    fn test_all_off_curve_contour() {
        let font = sample();
        let glyph = font.glyph(3).unwrap();
        let quads: Vec<&Curve> = glyph.path_list[0]
            .curves
            .iter()
            .filter(|c| c.is_curve)
            .collect();
        assert_eq!(quads.len(), 4);
        // each control point is an input point, each endpoint an implied
        // midpoint of two consecutive input points
        assert_eq!(quads[0].p1, Point::new(0.0, 0.0));
        assert_eq!(quads[0].p2, Point::new(50.0, 0.0));
        assert_eq!(quads[1].p1, Point::new(100.0, 0.0));
        assert_eq!(quads[3].p2, quads[0].p0);
    }

    #[test]
    fn test_contour_closure_across_all_simple_glyphs() {
        let font = sample();
        for glyph in font.glyphs.iter().filter(|g| g.num_contours > 0) {
            for path in &glyph.path_list {
                let first = path.curves.first().unwrap();
                let last = path.curves.last().unwrap();
                assert_eq!(
                    last.end_point(),
                    first.p0,
                    "glyph {} does not close",
                    glyph.glyph_index
                );
            }
        }
    }

    #[test]
    fn test_composite_glyph_transform() {
        let font = sample();
        let child = font.glyph(7).unwrap();
        let composite = font.glyph(8).unwrap();

        assert!(composite.num_contours < 0);
        assert_eq!(composite.path_list.len(), child.path_list.len());
        assert_eq!(composite.num_triangles, child.num_triangles);
        assert_eq!(composite.advance_width, 640); // repeated last advance
        assert_eq!(composite.left_side_bearing, 9);

        for (path, child_path) in composite.path_list.iter().zip(child.path_list.iter()) {
            for (curve, child_curve) in path.curves.iter().zip(child_path.curves.iter()) {
                assert_eq!(curve.is_curve, child_curve.is_curve);
                for (p, q) in &[
                    (curve.p0, child_curve.p0),
                    (curve.p1, child_curve.p1),
                    (curve.p2, child_curve.p2),
                ] {
                    assert_eq!(p.x, q.x * 0.5 + 10.0);
                    assert_eq!(p.y, q.y * 0.5 + 20.0);
                }
            }
        }
    }

    #[test]
    fn test_kerning_lookup() {
        let font = sample();
        assert_eq!(font.kerning_offset(65, 86), -80);
        assert_eq!(font.kerning_offset(86, 65), 0);
        assert_eq!(font.kerning_offset(1, 2), -30);
        assert_eq!(font.kerning_offset(2, 1), 0);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let data = sample_font();
        assert_eq!(parse_data(&data).unwrap(), parse_data(&data).unwrap());
    }

    #[test]
    fn test_missing_required_table() {
        // a font carrying everything except its glyf table
        let without_glyf: Vec<(&str, Vec<u8>)> = vec![
            ("head", head_data(1000, 1)),
            ("hhea", hhea_data(800, -200, 90, 1)),
            ("hmtx", hmtx_data(&[(500, 10)], &[])),
            ("loca", vec![0; 8]),
            ("maxp", maxp_data(1, 8, 1)),
            ("name", name_data(&[])),
            ("cmap", cmap_data(&[(3, 1, &format4_data(&[]))])),
        ];
        let err = parse_data(&build_font(&without_glyf)).unwrap_err();
        assert!(matches!(err, Error::MissingTable("glyf")));
        assert_eq!(err.code(), -2);
    }

    #[test]
    fn test_empty_font() {
        let data = build_font(&[
            ("head", head_data(1000, 1)),
            ("maxp", maxp_data(0, 0, 0)),
        ]);
        let err = parse_data(&data).unwrap_err();
        assert!(matches!(err, Error::EmptyFont));
        assert_eq!(err.code(), -2);
    }

    #[test]
    fn test_truncated_input() {
        let mut data = sample_font();
        data.truncate(40);
        let err = parse_data(&data).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput));
        assert_eq!(err.code(), -1);

        let err = parse_data(&[]).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput));
    }

    #[test]
    fn test_font_without_usable_cmap_still_parses() {
        let mut tables: Vec<(&str, Vec<u8>)> = vec![
            ("cmap", cmap_data(&[(1, 0, &format4_data(&[(65, 65, -64)]))])),
            ("head", head_data(1000, 1)),
            ("hhea", hhea_data(800, -200, 90, 1)),
            ("hmtx", hmtx_data(&[(500, 10)], &[])),
            ("maxp", maxp_data(1, 8, 1)),
            ("name", name_data(&[])),
        ];
        let block = simple_glyph_data([0, 0, 100, 100], &[&TRIANGLE]);
        let mut loca = Vec::new();
        loca.write_u32::<BigEndian>(0).unwrap();
        loca.write_u32::<BigEndian>(block.len() as u32).unwrap();
        tables.push(("loca", loca));
        tables.push(("glyf", block));

        let font = parse_data(&build_font(&tables)).unwrap();
        assert!(font.glyph_map.is_empty());
        assert_eq!(font.glyphs.len(), 1);
        assert_eq!(font.glyphs[0].character, 0);
        assert_eq!(font.glyphs[0].num_triangles, 3);
    }

    #[test]
    fn test_parse_file_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "ttf-glyphs-parse-file-{}.ttf",
            std::process::id()
        ));
        std::fs::write(&path, sample_font()).unwrap();

        let mut parsed = None;
        let code = parse_file(
            &path,
            |out: &mut Option<FontData>, font_data, code| {
                assert_eq!(code, 0);
                *out = Some(font_data);
            },
            &mut parsed,
        );
        std::fs::remove_file(&path).ok();

        assert_eq!(code, 0);
        let font = parsed.unwrap();
        assert_eq!(font.glyphs.len(), 9);
    }

    #[test]
    fn test_parse_file_missing() {
        let path = std::env::temp_dir().join("ttf-glyphs-does-not-exist.ttf");
        let mut seen = None;
        let code = parse_file(
            &path,
            |out: &mut Option<(FontData, i8)>, font_data, code| {
                *out = Some((font_data, code));
            },
            &mut seen,
        );

        assert_eq!(code, -1);
        let (font_data, callback_code) = seen.unwrap();
        assert_eq!(callback_code, -1);
        assert_eq!(font_data, FontData::default());
    }

    #[cfg(feature = "async")]
    #[test]
    fn test_parse_file_async_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "ttf-glyphs-parse-file-async-{}.ttf",
            std::process::id()
        ));
        std::fs::write(&path, sample_font()).unwrap();

        let code = async_std::task::block_on(parse_file_async(
            &path,
            |_, font_data: FontData, code| {
                assert_eq!(code, 0);
                assert_eq!(font_data.glyphs.len(), 9);
            },
            (),
        ));
        std::fs::remove_file(&path).ok();
        assert_eq!(code, 0);
    }
}
