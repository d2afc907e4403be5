//! Texture decoding and upload.
//!
//! Files are decoded with the `image` crate into RGBA8. A file that is missing
//! or undecodable is replaced by a 1×1 placeholder so the scene still draws;
//! the failure is logged, never propagated.

use std::path::{Path, PathBuf};

/// Flat colour drawn in place of a texture that failed to load.
pub const PLACEHOLDER_RGBA: [u8; 4] = [255, 0, 255, 255];

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The file could not be opened or decoded. Recoverable.
    #[error("texture {path:?} unavailable: {reason}")]
    MissingAsset { path: PathBuf, reason: String },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("texture data size ({actual}) does not match {width}x{height} RGBA8 ({expected})")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },
}

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: PLACEHOLDER_RGBA.to_vec(),
        }
    }

    pub fn decode(path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path).map_err(|e| TextureError::MissingAsset {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgba = image.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    /// Decode `path`, falling back to the placeholder.
    pub fn load_or_placeholder(path: &Path) -> Self {
        match Self::decode(path) {
            Ok(image) => {
                log::debug!("Decoded {path:?} ({}x{})", image.width, image.height);
                image
            }
            Err(err) => {
                log::warn!("{err}; using placeholder");
                Self::placeholder()
            }
        }
    }

    fn validate(&self) -> Result<(), TextureError> {
        if self.width == 0 || self.height == 0 {
            return Err(TextureError::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.rgba.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                actual: self.rgba.len(),
                expected,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// A sampled 2D texture on the GPU.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &TextureImage,
    ) -> Result<Self, TextureError> {
        image.validate()?;
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: None,
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::info!("Uploaded texture '{label}' ({}x{})", image.width, image.height);
        Ok(Self { texture, view })
    }
}

/// Repeating, linearly filtered sampler shared by every material.
pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("material-sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::headless_device;

    #[test]
    fn test_missing_file_is_missing_asset() {
        let err = TextureImage::decode(Path::new("/no/such/space-dust.jpg")).unwrap_err();
        assert!(matches!(err, TextureError::MissingAsset { .. }));
    }

    #[test]
    fn test_missing_file_falls_back_to_placeholder() {
        let image = TextureImage::load_or_placeholder(Path::new("/no/such/random.jpg"));
        assert_eq!(image, TextureImage::placeholder());
    }

    #[test]
    fn test_garbage_file_falls_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert_eq!(TextureImage::load_or_placeholder(&path), TextureImage::placeholder());
    }

    #[test]
    fn test_decode_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        let decoded = TextureImage::decode(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(&decoded.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_validation() {
        let bad = TextureImage {
            width: 2,
            height: 2,
            rgba: vec![0; 4],
        };
        assert!(matches!(bad.validate(), Err(TextureError::DataSizeMismatch { .. })));
        let empty = TextureImage {
            width: 0,
            height: 4,
            rgba: Vec::new(),
        };
        assert!(matches!(empty.validate(), Err(TextureError::ZeroDimensions { .. })));
        assert!(TextureImage::placeholder().validate().is_ok());
    }

    #[test]
    fn test_upload_placeholder() {
        let Some((device, queue)) = headless_device() else {
            return;
        };
        let texture = GpuTexture::upload(&device, &queue, "placeholder", &TextureImage::placeholder())
            .unwrap();
        assert_eq!(texture.texture.width(), 1);
    }
}
