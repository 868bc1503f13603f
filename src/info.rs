//! `LIST`/`INFO` metadata.
//!
//! Tags follow the RIFF INFO list, see <https://exiftool.org/TagNames/RIFF.html#Info>.

use crate::chunk::{read_tag, read_u32, ChunkTag};
use crate::error::{Error, Result};

/// Identifiers for textual metadata stored in an `INFO` list.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum InfoTag {
    /// `INAM`
    TrackTitle,
    /// `IPRD`
    AlbumTitle,
    /// `IART`
    Artist,
    /// `ICRD`
    CreationDate,
    /// `ITRK`
    TrackNumber,
    /// `ICMT`
    Comment,
    /// `IKEY`
    Keywords,
    /// `ISFT`
    CreatingSoftware,
    /// `IENG`
    Engineer,
    /// `ITCH`
    Technician,
    /// `IGNR`
    Genre,
    /// `ICOP`
    Copyright,
    /// `ISBJ`
    Subject,
    /// `ISRC`
    CreatorName,
}

impl InfoTag {
    /// Every supported tag
    pub const ALL: [InfoTag; 14] = [
        InfoTag::TrackTitle,
        InfoTag::AlbumTitle,
        InfoTag::Artist,
        InfoTag::CreationDate,
        InfoTag::TrackNumber,
        InfoTag::Comment,
        InfoTag::Keywords,
        InfoTag::CreatingSoftware,
        InfoTag::Engineer,
        InfoTag::Technician,
        InfoTag::Genre,
        InfoTag::Copyright,
        InfoTag::Subject,
        InfoTag::CreatorName,
    ];

    /// The four byte ASCII identifier written to the file
    pub const fn to_bytes(self) -> [u8; 4] {
        match self {
            InfoTag::TrackTitle => *b"INAM",
            InfoTag::AlbumTitle => *b"IPRD",
            InfoTag::Artist => *b"IART",
            InfoTag::CreationDate => *b"ICRD",
            InfoTag::TrackNumber => *b"ITRK",
            InfoTag::Comment => *b"ICMT",
            InfoTag::Keywords => *b"IKEY",
            InfoTag::CreatingSoftware => *b"ISFT",
            InfoTag::Engineer => *b"IENG",
            InfoTag::Technician => *b"ITCH",
            InfoTag::Genre => *b"IGNR",
            InfoTag::Copyright => *b"ICOP",
            InfoTag::Subject => *b"ISBJ",
            InfoTag::CreatorName => *b"ISRC",
        }
    }

    /// Look up a tag by its identifier, `None` for identifiers outside the supported set
    pub fn from_bytes(bytes: &[u8; 4]) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| &t.to_bytes() == bytes)
    }
}

/// A single metadata entry, written as one `INFO` sub chunk.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InfoEntry {
    /// Identifier
    pub tag: InfoTag,
    /// Text value, stored NUL terminated
    pub text: String,
}

impl InfoEntry {
    /// Create a new entry
    pub fn new(tag: InfoTag, text: impl Into<String>) -> Self {
        InfoEntry {
            tag,
            text: text.into(),
        }
    }

    /// Value of the sub chunk size field: text plus NUL terminator.
    pub(crate) fn size(&self) -> Result<u32> {
        text_size(self.text.len())
    }
}

fn text_size(len: usize) -> Result<u32> {
    len.checked_add(1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(Error::MetadataTooLong(len))
}

impl<S: Into<String>> From<(InfoTag, S)> for InfoEntry {
    fn from((tag, text): (InfoTag, S)) -> Self {
        InfoEntry::new(tag, text)
    }
}

/// Parse the payload of a `LIST` chunk with list type `INFO`.
///
/// Returns `None` for lists of any other type. Identifiers outside of
/// [`InfoTag`] are skipped.
pub(crate) fn parse_info_list(bytes: &[u8]) -> Result<Option<Vec<InfoEntry>>> {
    let list_type = read_tag(bytes, 0)?;

    if ChunkTag::from_bytes(&list_type) != ChunkTag::Info {
        return Ok(None);
    }

    let mut entries = vec![];
    let mut index = 4;

    while index < bytes.len() {
        let id = read_tag(bytes, index)?;
        let size = read_u32(bytes, index + 4)? as usize;

        let start = index + 8;
        let end = start.checked_add(size).ok_or(Error::UnexpectedEof)?;
        let raw = bytes.get(start..end).ok_or(Error::UnexpectedEof)?;

        if let Some(tag) = InfoTag::from_bytes(&id) {
            let text = raw.strip_suffix(b"\0").unwrap_or(raw);
            let text = std::str::from_utf8(text)
                .map_err(|_| Error::InvalidText(ChunkTag::Unknown(id)))?;

            entries.push(InfoEntry::new(tag, text));
        }

        index = end + (size & 1);
    }

    Ok(Some(entries))
}
