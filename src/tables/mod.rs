pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod kern;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod offset;

use std::io::{self, Cursor};

/// A table referenced from the font's table directory. `Dep` carries the
/// previously parsed tables a table needs to interpret its own bytes (e.g.
/// `loca` needs `head` for the offset format and `maxp` for the glyph count).
///
/// `unpack` is handed a cursor over exactly this table's byte range, so all
/// positions are relative to the table start.
pub trait FontTable<'a>: Sized {
    type Dep;

    fn name() -> &'static str;

    fn unpack<R: io::Read + AsRef<[u8]>>(
        rd: &mut Cursor<R>,
        dep: Self::Dep,
    ) -> Result<Self, io::Error>;
}

pub(crate) fn error(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::Other, message)
}
