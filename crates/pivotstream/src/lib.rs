//! Pivotstream - document-to-token pipeline for speed reading
//!
//! Pivotstream turns plain text, EPUB and PDF documents into display
//! tokens for rapid serial visual presentation (RSVP):
//! - Tokens with a fixation point and a pause weight
//! - Linear reading text recovered from EPUB and PDF containers
//! - Chapter markers that index into the token stream
//! - Non-fatal warnings for content that was skipped
//!
//! # Quick Start
//!
//! ```rust
//! use pivotstream::prelude::*;
//!
//! let tokens = tokenize("Read this, quickly.");
//! assert_eq!(tokens[1].core, "this");
//! assert_eq!(tokens[1].suffix, ",");
//! assert_eq!(tokens[2].fixation_char(), Some('i'));
//! ```
//!
//! # Features
//!
//! Enable format support with Cargo features:
//!
//! - `html` - HTML/XHTML text extraction (default)
//! - `epub` - EPUB reader (default)
//! - `pdf` - PDF reader and section inference (default)
//! - `serde` - Serialize tokens, markers and options
//! - `all` - Enable everything
//!
//! # Architecture
//!
//! Readers turn bytes into normalized text plus [`ChapterMarker`]s whose
//! `start_token_index` counts tokens of the whole returned text. The
//! tokenizer is independent of the readers; callers tokenize the text
//! they got back.

mod deadline;

// Re-export core types
pub use deadline::run_with_deadline;
pub use pivotstream_core::*;
pub use pivotstream_tokenize::{
    PauseWeights, Token, count_tokens, fixation_index, split_token, split_token_with_weights,
    tokenize, tokenize_with_weights,
};

/// HTML text extraction.
#[cfg(feature = "html")]
pub mod html {
    pub use pivotstream_read_html::{
        Attributes, HtmlHandler, HtmlText, NavLink, NavTocCollector, TextCollector,
        TitleCollector, extract, html_to_text, scan,
    };
}

/// EPUB format support.
#[cfg(feature = "epub")]
pub mod epub {
    pub use pivotstream_read_epub::{EpubText, extract_epub, extract_epub_with_options};
}

/// PDF format support.
#[cfg(feature = "pdf")]
pub mod pdf {
    pub use pivotstream_read_pdf::{
        PdfText, extract_pdf, extract_pdf_sections, extract_pdf_sections_with_options,
        extract_pdf_with_options,
    };
}

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        ChapterMarker, ExtractError, ExtractOptions, ExtractWarning, Extracted, PauseWeights,
        Token, tokenize,
    };

    #[cfg(feature = "epub")]
    pub use crate::epub::{EpubText, extract_epub};

    #[cfg(feature = "pdf")]
    pub use crate::pdf::{PdfText, extract_pdf, extract_pdf_sections};
}
