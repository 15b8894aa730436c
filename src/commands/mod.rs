mod digest;

pub use digest::{digest_file, digest_pages, digest_text, render_text};
