//! Image decoding and GPU texture upload.
//!
//! A texture that cannot be read or decoded is replaced by a checker
//! placeholder, so a broken asset shows up on screen instead of aborting.

use std::path::Path;

use anyhow::{Context, Result};

use crate::scene::{MinFilter, Sampling, TextureRef, Wrap};

const PLACEHOLDER_SIZE: u32 = 8;
const PLACEHOLDER_ON: [u8; 4] = [255, 0, 255, 255];
const PLACEHOLDER_OFF: [u8; 4] = [0, 0, 0, 255];

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    pub fn from_file(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("failed to load image {}", path.display()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::info!("Loaded texture {}x{} from {}", width, height, path.display());

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let data = color.repeat((width * height) as usize);
        Self { data, width, height }
    }

    /// Magenta and black checkerboard
    pub fn placeholder() -> Self {
        let data = (0..PLACEHOLDER_SIZE)
            .flat_map(|y| {
                (0..PLACEHOLDER_SIZE).flat_map(move |x| {
                    if (x + y) % 2 == 0 {
                        PLACEHOLDER_ON
                    } else {
                        PLACEHOLDER_OFF
                    }
                })
            })
            .collect();

        Self {
            data,
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
        }
    }

    /// Tangent-space normal pointing straight out of the surface
    pub fn flat_normal() -> Self {
        Self::solid(1, 1, [128, 128, 255, 255])
    }

    /// Downscale so neither side exceeds `max_dimension`, keeping the aspect ratio
    pub fn fit_within(self, max_dimension: u32) -> Self {
        let (width, height) = (self.width, self.height);
        if width <= max_dimension && height <= max_dimension {
            return self;
        }

        let scale = max_dimension as f64 / width.max(height) as f64;
        let target_width = ((width as f64 * scale).round() as u32).clamp(1, max_dimension);
        let target_height = ((height as f64 * scale).round() as u32).clamp(1, max_dimension);

        let Some(buffer) = image::RgbaImage::from_raw(width, height, self.data) else {
            log::warn!("Texture {}x{} has a malformed pixel buffer; using placeholder", width, height);
            return Self::placeholder();
        };

        log::warn!(
            "Texture {}x{} exceeds the {} texel limit, downscaling to {}x{}",
            width,
            height,
            max_dimension,
            target_width,
            target_height
        );
        let resized = image::imageops::resize(
            &buffer,
            target_width,
            target_height,
            image::imageops::FilterType::Triangle,
        );

        Self {
            data: resized.into_raw(),
            width: target_width,
            height: target_height,
        }
    }

    /// Load from disk, falling back to the placeholder
    pub fn load_or_placeholder(path: &Path) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            log::warn!("{:#}; using placeholder texture", e);
            Self::placeholder()
        })
    }
}

/// Whether texels hold colors or encoded normals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Color,
    Normal,
}

impl TextureKind {
    fn format(self) -> wgpu::TextureFormat {
        match self {
            TextureKind::Color => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureKind::Normal => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Uploaded texture with its view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &ImageData,
        kind: TextureKind,
        sampling: &Sampling,
        label: &str,
    ) -> Self {
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
            format: kind.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            texture.as_image_copy(),
            &image.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&sampler_descriptor(sampling, label));

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Load the referenced image, or the placeholder if that fails.
    /// Images larger than the device allows are downscaled first.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        reference: &TextureRef,
        kind: TextureKind,
    ) -> Self {
        let max_dimension = device.limits().max_texture_dimension_2d;
        let image = ImageData::load_or_placeholder(&reference.path).fit_within(max_dimension);
        let label = reference.path.display().to_string();
        Self::from_image(device, queue, &image, kind, &reference.sampling, &label)
    }
}

/// Sampler settings for a texture's sampling description
pub fn sampler_descriptor<'a>(sampling: &Sampling, label: &'a str) -> wgpu::SamplerDescriptor<'a> {
    let address_mode = match sampling.wrap {
        Wrap::Clamp => wgpu::AddressMode::ClampToEdge,
        Wrap::Repeat => wgpu::AddressMode::Repeat,
    };
    let min_filter = match sampling.min_filter {
        MinFilter::Nearest => wgpu::FilterMode::Nearest,
        MinFilter::Linear => wgpu::FilterMode::Linear,
    };

    wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    }
}
