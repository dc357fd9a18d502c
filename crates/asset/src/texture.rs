//! Texture loading: RGBA8 images and six-face cubemaps.
//!
//! The normal/parallax material expects a normal map with the height field
//! packed into the alpha channel, which is how the demo assets ship.

use std::path::Path;

use anyhow::{Context, Result, bail};

/// RGBA8 pixel data in CPU memory before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 4,
            "Pixel data does not match RGBA8 dimensions"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Load and convert a PNG file to RGBA8.
    pub fn load_png(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("Failed to open image {}", path.display()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::info!("Loaded texture {} ({}x{})", path.display(), width, height);
        Ok(Self::new_rgba8(width, height, rgba.into_raw()))
    }

    /// Procedural checkerboard, the placeholder diffuse when no assets ship.
    pub fn checkerboard(size: u32) -> Self {
        let mut data = Vec::with_capacity((size as usize) * (size as usize) * 4);
        for y in 0..size {
            for x in 0..size {
                let cell = ((x / 8) + (y / 8)) % 2;
                if cell == 0 {
                    data.extend_from_slice(&[235, 235, 235, 255]);
                } else {
                    data.extend_from_slice(&[96, 96, 96, 255]);
                }
            }
        }
        Self::new_rgba8(size, size, data)
    }

    /// Placeholder normal/height map: flat +Z normal, mid-level height.
    pub fn flat_normal_map(size: u32) -> Self {
        let pixel = [128u8, 128, 255, 128];
        let data = pixel.repeat((size as usize) * (size as usize));
        Self::new_rgba8(size, size, data)
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == (self.width as usize) * (self.height as usize) * 4
    }
}

/// Face order matches the GPU cube array layers: +X, -X, +Y, -Y, +Z, -Z.
pub const CUBE_FACE_NAMES: [&str; 6] = ["posx", "negx", "posy", "negy", "posz", "negz"];

/// Six square faces of an environment cubemap.
#[derive(Clone, Debug)]
pub struct CubemapData {
    pub faces: [TextureData; 6],
}

impl CubemapData {
    /// All faces must be square and the same size.
    pub fn new(faces: [TextureData; 6]) -> Result<Self> {
        let size = faces[0].width;
        for (face, name) in faces.iter().zip(CUBE_FACE_NAMES) {
            if face.width != face.height {
                bail!(
                    "Cubemap face '{name}' is not square ({}x{})",
                    face.width,
                    face.height
                );
            }
            if face.width != size {
                bail!(
                    "Cubemap face '{name}' is {}px, expected {size}px",
                    face.width
                );
            }
        }
        Ok(Self { faces })
    }

    /// Load `posx.png` ... `negz.png` from a directory.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let face = |name: &str| TextureData::load_png(dir.join(format!("{name}.png")));
        let faces = [
            face(CUBE_FACE_NAMES[0])?,
            face(CUBE_FACE_NAMES[1])?,
            face(CUBE_FACE_NAMES[2])?,
            face(CUBE_FACE_NAMES[3])?,
            face(CUBE_FACE_NAMES[4])?,
            face(CUBE_FACE_NAMES[5])?,
        ];
        Self::new(faces).with_context(|| format!("Invalid cubemap in {}", dir.display()))
    }

    #[inline]
    pub fn face_size(&self) -> u32 {
        self.faces[0].width
    }

    /// Procedural sky: horizon-to-zenith gradient, the fallback when no
    /// cubemap directory is given.
    pub fn test_sky(size: u32) -> Self {
        let zenith = [96u8, 134, 212];
        let horizon = [214u8, 224, 240];
        let shade = |t: f32| -> [u8; 4] {
            let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
            [
                lerp(horizon[0], zenith[0]),
                lerp(horizon[1], zenith[1]),
                lerp(horizon[2], zenith[2]),
                255,
            ]
        };

        let gradient_face = || -> TextureData {
            let mut data = Vec::with_capacity((size as usize) * (size as usize) * 4);
            for y in 0..size {
                let t = 1.0 - (y as f32 + 0.5) / size as f32;
                let px = shade(t);
                for _ in 0..size {
                    data.extend_from_slice(&px);
                }
            }
            TextureData::new_rgba8(size, size, data)
        };
        let flat_face = |t: f32| -> TextureData {
            let px = shade(t);
            let mut data = Vec::with_capacity((size as usize) * (size as usize) * 4);
            for _ in 0..size * size {
                data.extend_from_slice(&px);
            }
            TextureData::new_rgba8(size, size, data)
        };

        let faces = [
            gradient_face(), // +X
            gradient_face(), // -X
            flat_face(1.0),  // +Y: zenith
            flat_face(0.0),  // -Y: horizon color below
            gradient_face(), // +Z
            gradient_face(), // -Z
        ];
        Self { faces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_is_valid() {
        let tex = TextureData::checkerboard(32);
        assert!(tex.is_valid());
        assert_eq!(tex.data.len(), 32 * 32 * 4);
    }

    #[test]
    fn flat_normal_map_points_up() {
        let tex = TextureData::flat_normal_map(4);
        assert!(tex.is_valid());
        assert_eq!(&tex.data[0..4], &[128, 128, 255, 128]);
    }

    #[test]
    fn cubemap_rejects_mismatched_faces() {
        let mut faces: Vec<TextureData> =
            (0..6).map(|_| TextureData::checkerboard(16)).collect();
        faces[3] = TextureData::checkerboard(32);
        let faces: [TextureData; 6] = faces.try_into().unwrap();
        assert!(CubemapData::new(faces).is_err());
    }

    #[test]
    fn test_sky_faces_are_square_and_equal() {
        let sky = CubemapData::test_sky(8);
        assert_eq!(sky.face_size(), 8);
        for face in &sky.faces {
            assert!(face.is_valid());
            assert_eq!(face.width, face.height);
        }
    }
}
