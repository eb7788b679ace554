//! Reading and rewriting the `addon.xml` descriptor.
//!
//! The root `<addon>` element carries the `id` and `version` attributes.
//! Rewriting touches only the value of `version`; every other byte of the
//! document is written back as it was read.

use crate::error::{DescriptorError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::{Captures, Regex};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Descriptor file name inside an addon directory
pub const DESCRIPTOR_FILE: &str = "addon.xml";

const ROOT_ELEMENT: &[u8] = b"addon";

const BOM: char = '\u{feff}';

static VERSION_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\sversion\s*=\s*)("[^"]*"|'[^']*')"#).expect("valid version attribute pattern")
});

/// In-memory copy of an addon descriptor
#[derive(Debug, Clone)]
pub struct AddonDescriptor {
    path: PathBuf,
    bom: bool,
    content: String,
}

/// Root element location and the attributes we care about
struct RootTag {
    span: Range<usize>,
    id: Option<String>,
    version: Option<String>,
}

impl AddonDescriptor {
    /// Load `addon.xml` from `addon_dir`
    pub fn load(addon_dir: &Path) -> Result<Self> {
        let path = addon_dir.join(DESCRIPTOR_FILE);
        let content = std::fs::read_to_string(&path).map_err(|source| DescriptorError::Io {
            path: path.clone(),
            source,
        })?;
        // quick-xml offsets do not count a byte order mark
        let (bom, content) = match content.strip_prefix(BOM) {
            Some(rest) => (true, rest.to_string()),
            None => (false, content),
        };
        Ok(Self { path, bom, content })
    }

    /// Path of the descriptor file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Document text, without any byte order mark
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Addon identifier
    pub fn id(&self) -> Result<String> {
        self.root()?.id.ok_or_else(|| {
            DescriptorError::MissingAttribute {
                path: self.path.clone(),
                attribute: "id",
            }
            .into()
        })
    }

    /// Declared addon version
    pub fn version(&self) -> Result<String> {
        self.root()?.version.ok_or_else(|| {
            DescriptorError::MissingAttribute {
                path: self.path.clone(),
                attribute: "version",
            }
            .into()
        })
    }

    /// Replace the version value in memory
    pub fn set_version(&mut self, version: &str) -> Result<()> {
        let root = self.root()?;
        let Some(tag) = self.content.get(root.span.clone()) else {
            return Err(DescriptorError::UnexpectedRoot {
                path: self.path.clone(),
                found: "a root tag that could not be located".to_string(),
            }
            .into());
        };
        if !VERSION_ATTR.is_match(tag) {
            return Err(DescriptorError::MissingAttribute {
                path: self.path.clone(),
                attribute: "version",
            }
            .into());
        }

        let escaped = quick_xml::escape::escape(version);
        let rewritten = VERSION_ATTR.replacen(tag, 1, |caps: &Captures<'_>| {
            let quote = &caps[2][..1];
            format!("{}{quote}{escaped}{quote}", &caps[1])
        });
        let rewritten = rewritten.into_owned();
        self.content.replace_range(root.span, &rewritten);
        Ok(())
    }

    /// Write the document back to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        log::info!("Writing content to {}", self.path.display());
        let mut document = String::with_capacity(self.content.len() + BOM.len_utf8());
        if self.bom {
            document.push(BOM);
        }
        document.push_str(&self.content);
        std::fs::write(&self.path, document).map_err(|source| DescriptorError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    fn root(&self) -> Result<RootTag> {
        let parse_error = |source: quick_xml::Error| DescriptorError::Parse {
            path: self.path.clone(),
            source,
        };

        let mut reader = Reader::from_str(&self.content);
        loop {
            let start = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(parse_error)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if e.name().as_ref() != ROOT_ELEMENT {
                        return Err(DescriptorError::UnexpectedRoot {
                            path: self.path.clone(),
                            found: format!("<{}>", String::from_utf8_lossy(e.name().as_ref())),
                        }
                        .into());
                    }
                    let end = reader.buffer_position() as usize;
                    return Ok(RootTag {
                        span: start..end,
                        id: attribute(e, "id").map_err(parse_error)?,
                        version: attribute(e, "version").map_err(parse_error)?,
                    });
                }
                Event::Eof => {
                    return Err(DescriptorError::UnexpectedRoot {
                        path: self.path.clone(),
                        found: "an empty document".to_string(),
                    }
                    .into());
                }
                _ => {}
            }
        }
    }
}

fn attribute(
    element: &BytesStart<'_>,
    name: &str,
) -> std::result::Result<Option<String>, quick_xml::Error> {
    match element.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Version declared by the descriptor in `addon_dir`
pub fn get_version(addon_dir: &Path) -> Result<String> {
    AddonDescriptor::load(addon_dir)?.version()
}

/// Identifier declared by the descriptor in `addon_dir`
pub fn get_id(addon_dir: &Path) -> Result<String> {
    AddonDescriptor::load(addon_dir)?.id()
}

/// Rewrite the version of the descriptor in `addon_dir` in place
pub fn set_version(addon_dir: &Path, version: &str) -> Result<()> {
    let mut descriptor = AddonDescriptor::load(addon_dir)?;
    descriptor.set_version(version)?;
    descriptor.save()
}
