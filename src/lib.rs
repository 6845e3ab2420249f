//! Reader/writer for Sims 4 DBPF archives and the SimData typed-table
//! format they carry. Four layers, leaves first: the byte [`cursor`], the
//! [`refpack`] codec, the [`dbpf`] container (plus its [`writer`]), and
//! [`simdata`] on top of both. [`rid`] and [`hash`] are shared primitives
//! the other layers build on.

pub mod constants;
pub mod cursor;
pub mod dbpf;
pub mod hash;
pub mod refpack;
pub mod result;
pub mod rid;
pub mod simdata;
pub mod writer;

pub use dbpf::{DbpfFile, DbpfHeader, DbpfLocator, IndexEntry};
pub use result::{Error, Result};
pub use rid::{ResourceFilter, Rid, RidFormat};
pub use simdata::{Row, RowView, RowViewMut, SimDataDocument, Table, Value};
pub use writer::DbpfWriter;
