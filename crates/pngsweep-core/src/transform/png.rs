/// Production transform: decode any supported raster image and write an
/// opaque 8-bit RGB PNG.
///
/// The format is sniffed from the file contents only, never the name, so
/// `.jfif`/`.jif` JPEGs and mislabelled files decode correctly. Transparency is composited onto
/// white. The PNG is first written to a hidden sibling file and then renamed
/// into place, so an observer never sees a half-written file under the final
/// name.
use super::{Transform, TransformError};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, Rgb, RgbImage};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Image → flat PNG converter.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngTransform;

impl Transform for PngTransform {
    fn convert(&self, source: &Path, dest: &Path) -> Result<(), TransformError> {
        let read_error = |err| TransformError::Read {
            path: source.to_path_buf(),
            source: err,
        };
        // No extension hint: a `.webp` full of garbage must stay unidentified
        // rather than be handed to the WebP decoder.
        let file = File::open(source).map_err(read_error)?;
        let reader = ImageReader::new(BufReader::new(file))
            .with_guessed_format()
            .map_err(read_error)?;
        if reader.format().is_none() {
            return Err(TransformError::UnidentifiedFormat);
        }
        let img = reader.decode().map_err(|err| match err {
            ImageError::Unsupported(_) => TransformError::UnidentifiedFormat,
            ImageError::IoError(io) => TransformError::Read {
                path: source.to_path_buf(),
                source: io,
            },
            other => TransformError::Decode(other),
        })?;

        let flat = flatten_onto_white(img);
        write_atomically(&flat, dest)
    }
}

/// Drop the alpha channel by compositing every pixel over opaque white.
/// Images without alpha are converted straight to RGB8.
pub fn flatten_onto_white(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }
    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);
    for (x, y, px) in rgba.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}

/// Encode `img` as PNG into a temporary sibling of `dest`, then rename.
fn write_atomically(img: &RgbImage, dest: &Path) -> Result<(), TransformError> {
    let tmp = partial_path(dest);
    let result = encode_to(img, &tmp, dest).and_then(|()| {
        fs::rename(&tmp, dest).map_err(|err| write_error(dest, err))
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn encode_to(img: &RgbImage, tmp: &Path, dest: &Path) -> Result<(), TransformError> {
    let file = File::create(tmp).map_err(|err| write_error(dest, err))?;
    let mut writer = BufWriter::new(file);
    img.write_to(&mut writer, ImageFormat::Png).map_err(|err| match err {
        ImageError::IoError(io) => write_error(dest, io),
        other => TransformError::Encode(other),
    })?;
    writer.flush().map_err(|err| write_error(dest, err))
}

fn write_error(dest: &Path, err: std::io::Error) -> TransformError {
    if err.kind() == ErrorKind::PermissionDenied {
        TransformError::PermissionDenied {
            path: dest.to_path_buf(),
        }
    } else {
        TransformError::Write {
            path: dest.to_path_buf(),
            source: err,
        }
    }
}

/// `dir/name.png` → `dir/.name.png.partial`.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(dest.file_name().unwrap_or_default());
    name.push(".partial");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn transparent_pixels_become_white() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        let flat = flatten_onto_white(DynamicImage::ImageRgba8(img));
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(flat.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn half_transparent_black_becomes_grey() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let flat = flatten_onto_white(DynamicImage::ImageRgba8(img));
        let Rgb([r, g, b]) = *flat.get_pixel(0, 0);
        assert_eq!((r, g, b), (127, 127, 127));
    }

    #[test]
    fn converts_png_source_to_opaque_png() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("logo.webp");
        let img = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 0]));
        // Content is PNG; the format is sniffed, not taken from the name.
        img.save_with_format(&source, ImageFormat::Png).unwrap();
        let dest = tmp.path().join("logo.png");

        PngTransform.convert(&source, &dest).unwrap();

        let out = image::open(&dest).unwrap();
        assert!(!out.color().has_alpha());
        assert_eq!(out.to_rgb8().get_pixel(1, 1), &Rgb([255, 255, 255]));
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn garbage_input_is_unidentified_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("fake.webp");
        fs::write(&source, b"definitely not an image").unwrap();
        let dest = tmp.path().join("fake.png");

        let err = PngTransform.convert(&source, &dest).unwrap_err();
        assert!(matches!(err, TransformError::UnidentifiedFormat), "got {err:?}");
        assert!(!dest.exists());
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn truncated_image_is_a_decode_error_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let whole = tmp.path().join("whole.png");
        RgbaImage::from_pixel(16, 16, Rgba([1, 2, 3, 255]))
            .save_with_format(&whole, ImageFormat::Png)
            .unwrap();
        let bytes = fs::read(&whole).unwrap();
        let source = tmp.path().join("cut.jfif");
        // Valid PNG signature, missing image data.
        fs::write(&source, &bytes[..40]).unwrap();
        let dest = tmp.path().join("cut.png");

        let err = PngTransform.convert(&source, &dest).unwrap_err();
        // Identified by content despite the `.jfif` name, then fails to decode.
        assert!(!matches!(err, TransformError::UnidentifiedFormat), "got {err:?}");
        assert!(!dest.exists());
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn missing_source_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = PngTransform
            .convert(&tmp.path().join("gone.webp"), &tmp.path().join("gone.png"))
            .unwrap_err();
        assert!(matches!(err, TransformError::Read { .. }));
    }

    #[test]
    fn partial_path_is_hidden_sibling() {
        assert_eq!(
            partial_path(Path::new("/out/a.png")),
            PathBuf::from("/out/.a.png.partial")
        );
    }
}
