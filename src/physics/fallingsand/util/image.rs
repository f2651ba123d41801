//! Image utilities
//! Keeps us from having to use specific bevy types in the physics engine

use bevy::render::{
    render_resource::{Extent3d, TextureDimension, TextureFormat},
    texture::Image,
};

/// Bytes per RGBA8 pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Representing a raw RGBA image
/// Game engine agnostic, full ownership, no lifetimes, not a component
/// Pixels are row major, top row first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl RawImage {
    /// Gets the color of the pixel at column x and row `row`, counting rows from the top
    pub fn get_pixel(&self, x: usize, row: usize) -> [u8; 4] {
        let start = (row * self.width + x) * BYTES_PER_PIXEL;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[start..start + BYTES_PER_PIXEL]);
        out
    }

    /// The size this image would need as a texture
    pub fn extent(&self) -> Extent3d {
        Extent3d {
            width: self.width as u32,
            height: self.height as u32,
            depth_or_array_layers: 1,
        }
    }

    /// Convert to a bevy image
    /// Load this into an asset server to get a texture like the following
    /// ```ignore
    /// let image: RawImage = RawImage::default();
    /// let image_handle: Handle<Image> = images.add(image.to_bevy_image());
    /// ```
    pub fn to_bevy_image(self) -> Image {
        let size = self.extent();
        Image::new(
            size,
            TextureDimension::D2,
            self.pixels,
            TextureFormat::Rgba8UnormSrgb,
        )
    }
}
