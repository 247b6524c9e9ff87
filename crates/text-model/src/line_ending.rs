//! Line terminator helpers.
//!
//! The buffer never stores line separators: a row boundary is a virtual `'\n'`. Text written into
//! the buffer may use LF, CR or CRLF, and all three collapse into one boundary. When the buffer is
//! rendered back to text, rows are joined with a chosen [`LineTerminator`].

/// Line feed, the canonical separator exposed by the buffer.
pub const LF: char = '\n';
/// Carriage return.
pub const CR: char = '\r';
/// NUL, used by [`LineTerminator::Nul`].
pub const NUL: char = '\0';

/// The sequence placed between rows when a buffer is rendered or saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Classic Mac CR (`'\r'`).
    Cr,
    /// Windows-style CRLF (`"\r\n"`).
    CrLf,
    /// NUL (`'\0'`), for NUL-separated line lists.
    Nul,
}

impl LineTerminator {
    /// The terminator as a string slice.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Cr => "\r",
            Self::CrLf => "\r\n",
            Self::Nul => "\0",
        }
    }

    /// Length of the terminator in characters.
    pub fn char_len(self) -> usize {
        match self {
            Self::CrLf => 2,
            _ => 1,
        }
    }

    /// Detect the dominant line terminator of a source text.
    ///
    /// Policy: any CRLF wins, then any lone CR, otherwise LF. NUL is never detected.
    pub fn detect_in_text(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::CrLf
        } else if text.contains(CR) {
            Self::Cr
        } else {
            Self::Lf
        }
    }
}

/// Length in chars of the line separator starting at `chars[at]`, or `0` if there is none.
///
/// A CRLF pair counts as one separator two characters wide.
pub(crate) fn separator_len(chars: &[char], at: usize) -> usize {
    match chars.get(at) {
        Some(&LF) => 1,
        Some(&CR) if chars.get(at + 1) == Some(&LF) => 2,
        Some(&CR) => 1,
        _ => 0,
    }
}

/// Split `text` after its first line separator (LF, lone CR or CRLF).
///
/// Without a separator the whole text is the first part.
pub(crate) fn split_first_line(text: &str) -> (&str, &str) {
    let bytes = text.as_bytes();
    let end = match bytes.iter().position(|&b| b == b'\n' || b == b'\r') {
        Some(at) if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') => at + 2,
        Some(at) => at + 1,
        None => text.len(),
    };
    text.split_at(end)
}
