//! PDF engine: MuPDF locates text, lopdf writes annotations and the output

mod annotate;
mod source;
mod space;

pub use annotate::add_highlight_annotation;
pub use source::{PdfPage, PdfSource};
pub use space::PageSpace;
