use std::collections::HashMap;
use std::io::{self, Cursor};

use super::hmtx::HmtxTable;
use super::loca::LocaTable;
use super::FontTable;
use crate::geometry::{Curve, Path, Point, Transform};
use crate::Glyph;
use byteorder::{BigEndian, ReadBytesExt};
use log::warn;

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const ARGS_ARE_XY_VALUES: u16 = 0x0002;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;
const SCALED_COMPONENT_OFFSET: u16 = 0x0800;

/// The 'glyf' table is comprised of a list of glyph data blocks, each of
/// which describes a single glyph. Unpacking only slices the blocks apart
/// (driven by the loca offsets); decoding them into curve geometry is the
/// job of [`GlyphDecoder`].
/// See spec:
/// - https://docs.microsoft.com/en-us/typography/opentype/spec/glyf
/// - https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6glyf.html
#[derive(Debug, PartialEq, Clone)]
pub struct GlyfTable {
    pub(crate) glyphs: Vec<Option<GlyphData>>,
}

#[derive(Debug, PartialEq, Clone)]
pub(crate) struct GlyphData {
    /// If the number of contours is greater than or equal to zero, this is a
    /// simple glyph. If negative, this is a composite glyph.
    pub(crate) number_of_contours: i16,
    /// Minimum x for coordinate data.
    pub(crate) x_min: i16,
    /// Minimum y for coordinate data.
    pub(crate) y_min: i16,
    /// Maximum x for coordinate data.
    pub(crate) x_max: i16,
    /// Maximum y for coordinate data.
    pub(crate) y_max: i16,
    /// The glyph description (everything after the bounding box).
    pub(crate) description: Vec<u8>,
}

impl<'a> FontTable<'a> for GlyfTable {
    type Dep = &'a LocaTable;

    fn name() -> &'static str {
        "glyf"
    }

    fn unpack<R: io::Read + AsRef<[u8]>>(
        rd: &mut Cursor<R>,
        loca: Self::Dep,
    ) -> Result<Self, io::Error> {
        let data = rd.get_ref().as_ref();
        let mut glyphs = Vec::with_capacity(loca.offsets.len().saturating_sub(1));

        for (glyph_id, (start, end)) in loca
            .offsets
            .iter()
            .zip(loca.offsets.iter().skip(1))
            .enumerate()
        {
            let (start, end) = (*start as usize, *end as usize);
            if start == end {
                // glyph has no outline
                glyphs.push(None);
                continue;
            }

            let block = match data.get(start..end) {
                Some(block) if block.len() >= 10 => block,
                _ => {
                    warn!(
                        "glyph {} location {}..{} is outside the glyf table, leaving it empty",
                        glyph_id, start, end
                    );
                    glyphs.push(None);
                    continue;
                }
            };

            let mut header = Cursor::new(block);
            glyphs.push(Some(GlyphData {
                number_of_contours: header.read_i16::<BigEndian>()?,
                x_min: header.read_i16::<BigEndian>()?,
                y_min: header.read_i16::<BigEndian>()?,
                x_max: header.read_i16::<BigEndian>()?,
                y_max: header.read_i16::<BigEndian>()?,
                description: block[10..].to_vec(),
            }));
        }

        Ok(GlyfTable { glyphs })
    }
}

/// Decoded contour-point flags of a simple glyph.
///
/// The dual bits change meaning with the short bits: with `x_short` set,
/// `x_dual` is the sign of the one-byte delta (set means positive); without
/// it, `x_dual` means the coordinate repeats the previous point's value. Same
/// for y.
#[derive(Debug, Clone, Copy)]
struct OutlineFlags {
    on_curve: bool,
    x_short: bool,
    y_short: bool,
    repeat: bool,
    x_dual: bool,
    y_dual: bool,
}

impl OutlineFlags {
    fn new(byte: u8) -> Self {
        OutlineFlags {
            on_curve: byte & 0x01 != 0,
            x_short: byte & 0x02 != 0,
            y_short: byte & 0x04 != 0,
            repeat: byte & 0x08 != 0,
            x_dual: byte & 0x10 != 0,
            y_dual: byte & 0x20 != 0,
        }
    }
}

/// A fully decoded contour point in design units.
#[derive(Debug, Clone, Copy)]
struct ContourPoint {
    x: i16,
    y: i16,
    on_curve: bool,
}

impl ContourPoint {
    fn position(&self) -> Point {
        Point::new(self.x as f32, self.y as f32)
    }
}

fn midpoint(a: ContourPoint, b: ContourPoint) -> Point {
    Point::new(
        (a.x as f32 + b.x as f32) / 2.0,
        (a.y as f32 + b.y as f32) / 2.0,
    )
}

/// Converts an F2Dot14 fixed-point value (2 integer bits, 14 fraction bits,
/// range [-2, 2)) to a float.
fn f2dot14(value: i16) -> f32 {
    let integer = -2 * ((value >> 15) & 1) + ((value >> 14) & 1);
    (value & 0x3FFF) as f32 / 16384.0 + integer as f32
}

fn read_f2dot14<R: io::Read>(rd: &mut R) -> Result<f32, io::Error> {
    Ok(f2dot14(rd.read_i16::<BigEndian>()?))
}

/// One component reference inside a composite glyph, with its resolved
/// affine transform.
#[derive(Debug, PartialEq, Clone)]
struct ComponentRecord {
    flags: u16,
    glyph_index: u16,
    transform: Transform,
    /// Set when the arguments are an x/y translation. Otherwise they are
    /// matched point indices, which this decoder does not support.
    args_are_xy: bool,
}

impl ComponentRecord {
    fn unpack<R: io::Read>(rd: &mut R) -> Result<Self, io::Error> {
        let flags = rd.read_u16::<BigEndian>()?;
        let glyph_index = rd.read_u16::<BigEndian>()?;

        let (arg1, arg2) = if flags & ARG_1_AND_2_ARE_WORDS != 0 {
            (
                rd.read_i16::<BigEndian>()? as f32,
                rd.read_i16::<BigEndian>()? as f32,
            )
        } else {
            (rd.read_i8()? as f32, rd.read_i8()? as f32)
        };

        let mut transform = Transform::IDENTITY;
        if flags & WE_HAVE_A_SCALE != 0 {
            let scale = read_f2dot14(rd)?;
            transform.a = scale;
            transform.d = scale;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            transform.a = read_f2dot14(rd)?;
            transform.d = read_f2dot14(rd)?;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            transform.a = read_f2dot14(rd)?;
            transform.b = read_f2dot14(rd)?;
            transform.c = read_f2dot14(rd)?;
            transform.d = read_f2dot14(rd)?;
        }

        let args_are_xy = flags & ARGS_ARE_XY_VALUES != 0;
        if args_are_xy {
            transform.tx = arg1;
            transform.ty = arg2;
            if flags & SCALED_COMPONENT_OFFSET != 0 {
                // only the diagonal scales the offset, even for a full 2x2
                // matrix; the Apple spec is ambiguous here and this matches
                // established rasterizer behavior
                transform.tx *= transform.a;
                transform.ty *= transform.d;
            }
        }

        // hinting instructions are never executed
        if flags & WE_HAVE_INSTRUCTIONS != 0 {
            let num_instructions = rd.read_u16::<BigEndian>()?;
            let mut instructions = vec![0; num_instructions as usize];
            rd.read_exact(&mut instructions)?;
        }

        Ok(ComponentRecord {
            flags,
            glyph_index,
            transform,
            args_are_xy,
        })
    }

    fn more_components(&self) -> bool {
        self.flags & MORE_COMPONENTS != 0
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

/// Turns raw glyph data blocks into curve geometry, visiting glyph ids in
/// order and resolving composite references recursively. Every glyph is
/// decoded exactly once (tracked per glyph id), so composites can reference
/// glyphs in any order, and a reference cycle is caught as an error on the
/// offending component.
pub(crate) struct GlyphDecoder<'a> {
    glyf: &'a GlyfTable,
    hmtx: &'a HmtxTable,
    /// Reverse character mapping (glyph id to code point) used to stamp each
    /// glyph with one of its code points.
    reverse_map: &'a HashMap<u16, u32>,
    max_contours: u16,
    max_component_depth: u16,
}

impl<'a> GlyphDecoder<'a> {
    pub fn new(
        glyf: &'a GlyfTable,
        hmtx: &'a HmtxTable,
        reverse_map: &'a HashMap<u16, u32>,
        max_contours: u16,
        max_component_depth: u16,
    ) -> Self {
        GlyphDecoder {
            glyf,
            hmtx,
            reverse_map,
            max_contours,
            // fonts in the wild understate this for single-level composites
            max_component_depth: max_component_depth.max(1),
        }
    }

    /// Decodes all glyphs. A glyph whose data is broken keeps its metrics but
    /// stays empty; the rest of the font is unaffected.
    pub fn decode_all(&self) -> Vec<Glyph> {
        let count = self.glyf.glyphs.len();
        let mut glyphs: Vec<Glyph> = (0..count).map(|id| self.initial_glyph(id as u16)).collect();
        let mut state = vec![LoadState::NotLoaded; count];

        for id in 0..count {
            if let Err(err) = self.decode(id as u16, 0, &mut glyphs, &mut state) {
                warn!("glyph {} is broken and stays empty: {}", id, err);
            }
        }

        glyphs
    }

    fn initial_glyph(&self, glyph_id: u16) -> Glyph {
        Glyph {
            character: self.reverse_map.get(&glyph_id).copied().unwrap_or(0),
            glyph_index: glyph_id,
            num_contours: 0,
            path_list: Vec::new(),
            advance_width: self.hmtx.advance_width(glyph_id),
            left_side_bearing: self.hmtx.left_side_bearing(glyph_id),
            bounding_box: [0; 4],
            num_triangles: 0,
        }
    }

    fn decode(
        &self,
        glyph_id: u16,
        depth: u16,
        glyphs: &mut Vec<Glyph>,
        state: &mut [LoadState],
    ) -> Result<(), io::Error> {
        match state[glyph_id as usize] {
            LoadState::Loaded => return Ok(()),
            LoadState::Loading => {
                return Err(super::error(format!(
                    "cyclic composite reference to glyph {}",
                    glyph_id
                )))
            }
            LoadState::NotLoaded => {}
        }

        state[glyph_id as usize] = LoadState::Loading;
        let result = self.decode_glyph(glyph_id, depth, glyphs, state);
        state[glyph_id as usize] = LoadState::Loaded;
        result
    }

    fn decode_glyph(
        &self,
        glyph_id: u16,
        depth: u16,
        glyphs: &mut Vec<Glyph>,
        state: &mut [LoadState],
    ) -> Result<(), io::Error> {
        let data = match &self.glyf.glyphs[glyph_id as usize] {
            Some(data) => data,
            // no outline; metrics are already in place
            None => return Ok(()),
        };

        glyphs[glyph_id as usize].num_contours = data.number_of_contours;
        glyphs[glyph_id as usize].bounding_box = [data.x_min, data.y_min, data.x_max, data.y_max];

        let glyph_center = Point::new(
            (data.x_min as f32 + data.x_max as f32) / 2.0,
            (data.y_min as f32 + data.y_max as f32) / 2.0,
        );

        if data.number_of_contours > 0 {
            let path_list = self.decode_simple(data, glyph_center)?;
            glyphs[glyph_id as usize].num_triangles = path_list
                .iter()
                .map(|path| path.curves.len() as u32)
                .sum();
            glyphs[glyph_id as usize].path_list = path_list;
        } else if data.number_of_contours < 0 {
            let (path_list, num_triangles) = self.decode_composite(data, depth, glyphs, state)?;
            glyphs[glyph_id as usize].num_triangles = num_triangles;
            glyphs[glyph_id as usize].path_list = path_list;
        }

        Ok(())
    }

    fn decode_simple(&self, data: &GlyphData, glyph_center: Point) -> Result<Vec<Path>, io::Error> {
        let num_contours = data.number_of_contours as usize;
        if data.number_of_contours as u16 > self.max_contours {
            return Err(super::error(format!(
                "glyph claims {} contours but the font allows at most {}",
                data.number_of_contours, self.max_contours
            )));
        }

        let mut rd = Cursor::new(&data.description[..]);

        let mut contour_end = Vec::with_capacity(num_contours);
        for _ in 0..num_contours {
            contour_end.push(rd.read_u16::<BigEndian>()?);
        }
        if contour_end.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(super::error(
                "contour end points are not strictly increasing".to_string(),
            ));
        }
        let num_points = contour_end[num_contours - 1] as usize + 1;

        // hinting instructions are never executed
        let num_instructions = rd.read_u16::<BigEndian>()?;
        rd.set_position(rd.position() + num_instructions as u64);

        let flags = unpack_outline_flags(&mut rd, num_points)?;
        let xs = unpack_coordinates(&mut rd, &flags, |f| (f.x_short, f.x_dual))?;
        let ys = unpack_coordinates(&mut rd, &flags, |f| (f.y_short, f.y_dual))?;

        let points: Vec<ContourPoint> = flags
            .iter()
            .zip(xs.iter().zip(ys.iter()))
            .map(|(flags, (&x, &y))| ContourPoint {
                x,
                y,
                on_curve: flags.on_curve,
            })
            .collect();

        let mut path_list = Vec::with_capacity(num_contours);
        let mut start = 0;
        for &end in &contour_end {
            let end = end as usize;
            path_list.push(emit_contour(&points[start..=end], glyph_center));
            start = end + 1;
        }

        Ok(path_list)
    }

    fn decode_composite(
        &self,
        data: &GlyphData,
        depth: u16,
        glyphs: &mut Vec<Glyph>,
        state: &mut [LoadState],
    ) -> Result<(Vec<Path>, u32), io::Error> {
        let mut rd = Cursor::new(&data.description[..]);
        let mut path_list = Vec::new();
        let mut num_triangles = 0;

        loop {
            let record = ComponentRecord::unpack(&mut rd)?;
            let child = record.glyph_index;

            if !record.args_are_xy {
                warn!(
                    "matched-point positioning of component glyph {} is not supported, skipping it",
                    child
                );
            } else if child as usize >= self.glyf.glyphs.len() {
                warn!("bad glyph index {} in composite glyph, skipping the component", child);
            } else if depth >= self.max_component_depth {
                warn!(
                    "composite nesting deeper than {} levels, skipping component glyph {}",
                    self.max_component_depth, child
                );
            } else if let Err(err) = self.decode(child, depth + 1, glyphs, state) {
                warn!("skipping broken component glyph {}: {}", child, err);
            } else {
                let component = &glyphs[child as usize];
                for path in &component.path_list {
                    path_list.push(record.transform.apply_path(path));
                }
                num_triangles += component.num_triangles;
            }

            if !record.more_components() {
                break;
            }
        }

        Ok((path_list, num_triangles))
    }
}

fn unpack_outline_flags<R: io::Read>(
    rd: &mut R,
    num_points: usize,
) -> Result<Vec<OutlineFlags>, io::Error> {
    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let decoded = OutlineFlags::new(rd.read_u8()?);
        flags.push(decoded);
        if decoded.repeat {
            let count = rd.read_u8()?;
            for _ in 0..count {
                if flags.len() == num_points {
                    break;
                }
                flags.push(decoded);
            }
        }
    }
    Ok(flags)
}

/// Decodes one delta-coded coordinate axis. `select` picks the short and
/// dual bits of the axis from the point flags.
fn unpack_coordinates<R, F>(
    rd: &mut R,
    flags: &[OutlineFlags],
    select: F,
) -> Result<Vec<i16>, io::Error>
where
    R: io::Read,
    F: Fn(&OutlineFlags) -> (bool, bool),
{
    let mut coordinates = Vec::with_capacity(flags.len());
    let mut value = 0i16;
    for point_flags in flags {
        let (short, dual) = select(point_flags);
        if short {
            let delta = rd.read_u8()? as i16;
            value = if dual {
                value.wrapping_add(delta)
            } else {
                value.wrapping_sub(delta)
            };
        } else if !dual {
            value = value.wrapping_add(rd.read_i16::<BigEndian>()?);
        }
        // short unset and dual set: the coordinate repeats the previous value
        coordinates.push(value);
    }
    Ok(coordinates)
}

/// Emits the curve sequence for one closed contour.
///
/// Consecutive off-curve points imply an on-curve point at their midpoint;
/// each emitted quadratic is preceded by a straight fan line from its start
/// to its end whose `p2` anchors at the glyph center, and plain on-to-on
/// segments carry the fan anchor in `p2` themselves. This keeps every curve
/// worth exactly one triangle of the downstream triangle fan.
fn emit_contour(points: &[ContourPoint], glyph_center: Point) -> Path {
    let fan_anchor = Point::new(glyph_center.x + 0.5, glyph_center.y + 0.5);
    let count = points.len();
    let mut curves = Vec::with_capacity(count * 2);

    // the starting on-curve position: the first point itself, the last point
    // of the contour, or the implied midpoint between the two when both ends
    // are off-curve
    let mut prev_point = if !points[0].on_curve {
        let last = points[count - 1];
        if !last.on_curve {
            midpoint(points[0], last)
        } else {
            last.position()
        }
    } else {
        points[0].position()
    };

    let mut k = 0;
    while k < count {
        let p0 = points[k];
        let p1 = points[(k + 1) % count];

        let curve = match (p0.on_curve, p1.on_curve) {
            (false, false) => {
                let end = midpoint(p0, p1);
                let curve = Curve {
                    p0: prev_point,
                    p1: p0.position(),
                    p2: end,
                    is_curve: true,
                };
                prev_point = end;
                curve
            }
            (false, true) => Curve {
                p0: prev_point,
                p1: p0.position(),
                p2: p1.position(),
                is_curve: true,
            },
            (true, true) => {
                prev_point = p0.position();
                Curve {
                    p0: p0.position(),
                    p1: p1.position(),
                    p2: fan_anchor,
                    is_curve: false,
                }
            }
            (true, false) => {
                // p1 is the control point; the curve ends on p2 or, when p2
                // is off-curve as well, on the implied midpoint
                let p2 = points[(k + 2) % count];
                let curve = if !p2.on_curve {
                    let end = midpoint(p1, p2);
                    let curve = Curve {
                        p0: p0.position(),
                        p1: p1.position(),
                        p2: end,
                        is_curve: true,
                    };
                    prev_point = end;
                    curve
                } else {
                    prev_point = p0.position();
                    Curve {
                        p0: p0.position(),
                        p1: p1.position(),
                        p2: p2.position(),
                        is_curve: true,
                    }
                };
                // the consumed on-curve start point is not revisited
                k += 1;
                curve
            }
        };

        if curve.is_curve {
            curves.push(Curve {
                p0: curve.p0,
                p1: curve.p2,
                p2: fan_anchor,
                is_curve: false,
            });
        }
        curves.push(curve);
        k += 1;
    }

    Path { curves }
}
