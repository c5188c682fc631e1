//! Icon loading for rows.
//!
//! Image files get a real thumbnail decoded with the `image` crate. Everything else gets a
//! generic square per entry kind, generated once per size and cached.

use image::{DynamicImage, Rgba, RgbaImage};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use crate::config::{LARGE_ICON_SIZE, SMALL_ICON_SIZE};
use crate::file_system::FsEntry;
use crate::ignore_poison::{IgnorePoison, IgnorePoisonRw};

/// A decoded RGBA icon. Cloning shares the pixels.
#[derive(Clone)]
pub struct Icon(Arc<RgbaImage>);

impl Icon {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// Square of one color with a one-pixel darker border.
    pub fn generic(size: u32, fill: [u8; 4]) -> Self {
        let border = [fill[0] / 2, fill[1] / 2, fill[2] / 2, fill[3]];
        let last = size.saturating_sub(1);
        let image = RgbaImage::from_fn(size, size, |x, y| {
            if x == 0 || y == 0 || x == last || y == last {
                Rgba(border)
            } else {
                Rgba(fill)
            }
        });
        Self::new(image)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.0
    }

    /// True when both handles point at the same pixels.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Icon({}x{})", self.width(), self.height())
    }
}

/// Error type for icon loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconError {
    /// The format can't be decoded
    Unsupported(String),
    /// The file is corrupt or truncated
    Decode(String),
    /// Couldn't read the file
    Io(String),
}

impl fmt::Display for IconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(msg) => write!(f, "Unsupported image: {}", msg),
            Self::Decode(msg) => write!(f, "Couldn't decode image: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for IconError {}

impl From<image::ImageError> for IconError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Self::Io(e.to_string()),
            image::ImageError::Unsupported(e) => Self::Unsupported(e.to_string()),
            other => Self::Decode(other.to_string()),
        }
    }
}

/// Produces the two icon representations of an entry. Called from worker threads.
pub trait IconProvider: Send + Sync {
    fn load_large_icon(&self, entry: &FsEntry) -> Result<Icon, IconError>;
    fn load_small_icon(&self, entry: &FsEntry) -> Result<Icon, IconError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GenericKind {
    Directory,
    Archive,
    File,
}

impl GenericKind {
    fn of(entry: &FsEntry) -> Self {
        if entry.is_directory() {
            Self::Directory
        } else if entry.is_archive() {
            Self::Archive
        } else {
            Self::File
        }
    }

    fn fill(self) -> [u8; 4] {
        match self {
            Self::Directory => [0xE8, 0xB9, 0x4A, 0xFF],
            Self::Archive => [0xA0, 0x78, 0x50, 0xFF],
            Self::File => [0xDD, 0xDD, 0xDD, 0xFF],
        }
    }
}

/// Thumbnails for images, generic squares for the rest.
pub struct ThumbnailIconProvider {
    large_size: u32,
    small_size: u32,
    generic: RwLock<HashMap<(GenericKind, u32), Icon>>,
    /// The large and small icon of an entry are requested back to back, so keeping the last
    /// decoded image avoids decoding every file twice.
    last_decoded: Mutex<Option<(PathBuf, Arc<DynamicImage>)>>,
}

impl Default for ThumbnailIconProvider {
    fn default() -> Self {
        Self::new(LARGE_ICON_SIZE, SMALL_ICON_SIZE)
    }
}

impl ThumbnailIconProvider {
    pub fn new(large_size: u32, small_size: u32) -> Self {
        Self {
            large_size,
            small_size,
            generic: RwLock::new(HashMap::new()),
            last_decoded: Mutex::new(None),
        }
    }

    fn load_icon(&self, entry: &FsEntry, size: u32) -> Result<Icon, IconError> {
        if entry.is_supported_image() {
            let decoded = self.decode(entry)?;
            return Ok(Icon::new(decoded.thumbnail(size, size).to_rgba8()));
        }
        Ok(self.generic_icon(GenericKind::of(entry), size))
    }

    fn decode(&self, entry: &FsEntry) -> Result<Arc<DynamicImage>, IconError> {
        if let Some((path, image)) = self.last_decoded.lock_ignore_poison().as_ref()
            && *path == entry.path
        {
            return Ok(Arc::clone(image));
        }

        let started = std::time::Instant::now();
        let image = Arc::new(image::open(&entry.path)?);
        log::trace!(
            "Decoded {} ({}x{}) in {}ms",
            entry.path.display(),
            image.width(),
            image.height(),
            started.elapsed().as_millis()
        );
        *self.last_decoded.lock_ignore_poison() = Some((entry.path.clone(), Arc::clone(&image)));
        Ok(image)
    }

    fn generic_icon(&self, kind: GenericKind, size: u32) -> Icon {
        if let Some(icon) = self.generic.read_ignore_poison().get(&(kind, size)) {
            return icon.clone();
        }
        self.generic_icon_uncached(kind, size)
    }

    fn generic_icon_uncached(&self, kind: GenericKind, size: u32) -> Icon {
        let mut cache = self.generic.write_ignore_poison();
        cache
            .entry((kind, size))
            .or_insert_with(|| Icon::generic(size, kind.fill()))
            .clone()
    }
}

impl IconProvider for ThumbnailIconProvider {
    fn load_large_icon(&self, entry: &FsEntry) -> Result<Icon, IconError> {
        self.load_icon(entry, self.large_size)
    }

    fn load_small_icon(&self, entry: &FsEntry) -> Result<Icon, IconError> {
        self.load_icon(entry, self.small_size)
    }
}
