//! Image output: ASCII PPM and the formats the `image` crate encodes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::RgbImage;

use crate::error::{RenderError, RenderResult};
use crate::renderer::ImageBuffer;

/// Write the image as ASCII PPM (P3), top row first, one pixel per line.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for rgb in image.to_rgb8().chunks_exact(3) {
        writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
    }

    writer.flush()
}

/// Save the image, choosing the format from the file extension.
///
/// `.ppm` is written as ASCII P3; anything else goes through the `image`
/// crate as 8-bit RGB.
pub fn save(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let io_err = |source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_err)?;
        write_ppm(image, BufWriter::new(file)).map_err(io_err)?;
    } else {
        let rgb = RgbImage::from_raw(image.width, image.height, image.to_rgb8()).ok_or_else(
            || RenderError::InvalidSettings("pixel buffer does not match image size".to_string()),
        )?;
        rgb.save(path).map_err(|source| RenderError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    }

    log::debug!("Wrote {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;

    fn two_by_two() -> ImageBuffer {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::new(1.0, 0.0, 0.0));
        image.set(1, 0, Color::new(0.0, 1.0, 0.0));
        image.set(0, 1, Color::new(0.0, 0.0, 1.0));
        image.set(1, 1, Color::splat(0.25));
        image
    }

    #[test]
    fn test_write_ppm() {
        let mut out = Vec::new();
        write_ppm(&two_by_two(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "P3",
                "2 2",
                "255",
                "255 0 0",
                "0 255 0",
                "0 0 255",
                "127 127 127"
            ]
        );
    }

    #[test]
    fn test_save_ppm_and_png() {
        let dir = std::env::temp_dir().join(format!("orb_output_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let buffer = two_by_two();

        let ppm = dir.join("out.ppm");
        save(&buffer, &ppm).unwrap();
        assert!(std::fs::read_to_string(&ppm).unwrap().starts_with("P3\n2 2\n255\n"));

        let png = dir.join("out.png");
        save(&buffer, &png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 255, 0]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let path = Path::new("/nonexistent/orb/out.ppm");
        let err = save(&ImageBuffer::new(1, 1), path).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
