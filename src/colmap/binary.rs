//! Readers for the little-endian COLMAP sparse model files.
//!
//! Layouts, per record after a leading `u64` count:
//! - `cameras.bin`: `u32` id, `i32` model, `u64` width, `u64` height, `f64` params
//! - `images.bin`: `u32` id, 4 x `f64` qvec, 3 x `f64` tvec, `u32` camera id,
//!   NUL-terminated name, `u64` n, n x (`f64` x, `f64` y, `i64` point3d id)
//! - `points3D.bin`: `u64` id, 3 x `f64` xyz, 3 x `u8` rgb, `f64` error,
//!   `u64` n, n x (`u32` image id, `u32` point2d idx)

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use super::{Camera, CameraModelId, ColmapError, Image, Point3D};

// Upper bound for up-front allocations; counts come from untrusted headers.
const MAX_PREALLOC: u64 = 1 << 16;

pub fn read_cameras_bin(path: impl AsRef<Path>) -> Result<Vec<Camera>, ColmapError> {
    let mut reader = BufReader::new(File::open(path)?);
    parse_cameras(&mut reader)
}

pub fn read_images_bin(path: impl AsRef<Path>) -> Result<Vec<Image>, ColmapError> {
    let mut reader = BufReader::new(File::open(path)?);
    parse_images(&mut reader)
}

pub fn read_points3d_bin(path: impl AsRef<Path>) -> Result<Vec<Point3D>, ColmapError> {
    let mut reader = BufReader::new(File::open(path)?);
    parse_points3d(&mut reader)
}

fn parse_cameras<R: Read>(reader: &mut R) -> Result<Vec<Camera>, ColmapError> {
    let num_cameras = read_u64(reader)?;
    let mut cameras = Vec::with_capacity(num_cameras.min(MAX_PREALLOC) as usize);
    for _ in 0..num_cameras {
        let camera_id = read_u32(reader)?;
        let model_id = read_i32(reader)?;
        let model =
            CameraModelId::from_id(model_id).ok_or(ColmapError::UnknownCameraModel(model_id))?;
        let width = read_u64(reader)?;
        let height = read_u64(reader)?;
        let params = (0..model.num_params())
            .map(|_| read_f64(reader))
            .collect::<Result<Vec<_>, _>>()?;
        cameras.push(Camera {
            camera_id,
            model,
            width,
            height,
            params,
        });
    }
    Ok(cameras)
}

fn parse_images<R: BufRead>(reader: &mut R) -> Result<Vec<Image>, ColmapError> {
    let num_images = read_u64(reader)?;
    let mut images = Vec::with_capacity(num_images.min(MAX_PREALLOC) as usize);
    for _ in 0..num_images {
        let image_id = read_u32(reader)?;
        let [qw, qx, qy, qz] = [
            read_f64(reader)?,
            read_f64(reader)?,
            read_f64(reader)?,
            read_f64(reader)?,
        ];
        let translation = Vector3::new(read_f64(reader)?, read_f64(reader)?, read_f64(reader)?);
        let camera_id = read_u32(reader)?;
        let name = read_name(reader)?;

        let num_points2d = read_u64(reader)?;
        let mut points2d = Vec::with_capacity(num_points2d.min(MAX_PREALLOC) as usize);
        for _ in 0..num_points2d {
            points2d.push((read_f64(reader)?, read_f64(reader)?, read_i64(reader)?));
        }

        images.push(Image {
            image_id,
            camera_id,
            name,
            rotation: UnitQuaternion::new_unchecked(Quaternion::new(qw, qx, qy, qz)),
            translation,
            points2d,
        });
    }
    Ok(images)
}

fn parse_points3d<R: Read>(reader: &mut R) -> Result<Vec<Point3D>, ColmapError> {
    let num_points = read_u64(reader)?;
    let mut points = Vec::with_capacity(num_points.min(MAX_PREALLOC) as usize);
    for _ in 0..num_points {
        let point3d_id = read_u64(reader)?;
        let xyz = [read_f64(reader)?, read_f64(reader)?, read_f64(reader)?];
        let rgb = [read_u8(reader)?, read_u8(reader)?, read_u8(reader)?];
        let error = read_f64(reader)?;
        let track_len = read_u64(reader)?;
        let track = (0..track_len)
            .map(|_| Ok((read_u32(reader)?, read_u32(reader)?)))
            .collect::<Result<Vec<_>, ColmapError>>()?;
        points.push(Point3D {
            point3d_id,
            xyz,
            rgb,
            error,
            track,
        });
    }
    Ok(points)
}

fn read_name<R: BufRead>(reader: &mut R) -> Result<String, ColmapError> {
    let mut bytes = Vec::new();
    reader.read_until(b'\0', &mut bytes)?;
    if bytes.pop() != Some(b'\0') {
        return Err(ColmapError::ParseError(
            "unterminated image name".to_string(),
        ));
    }
    String::from_utf8(bytes).map_err(|e| ColmapError::ParseError(e.to_string()))
}

fn read_bytes<const N: usize, R: Read>(reader: &mut R) -> std::io::Result<[u8; N]> {
    let mut bytes = [0u8; N];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

fn read_u8<R: Read>(reader: &mut R) -> std::io::Result<u8> {
    Ok(read_bytes::<1, _>(reader)?[0])
}

fn read_u32<R: Read>(reader: &mut R) -> std::io::Result<u32> {
    read_bytes(reader).map(u32::from_le_bytes)
}

fn read_i32<R: Read>(reader: &mut R) -> std::io::Result<i32> {
    read_bytes(reader).map(i32::from_le_bytes)
}

fn read_u64<R: Read>(reader: &mut R) -> std::io::Result<u64> {
    read_bytes(reader).map(u64::from_le_bytes)
}

fn read_i64<R: Read>(reader: &mut R) -> std::io::Result<i64> {
    read_bytes(reader).map(i64::from_le_bytes)
}

fn read_f64<R: Read>(reader: &mut R) -> std::io::Result<f64> {
    read_bytes(reader).map(f64::from_le_bytes)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn sample_image() -> Image {
        Image {
            image_id: 7,
            camera_id: 2,
            name: "frame_0007.png".to_string(),
            rotation: UnitQuaternion::new_unchecked(Quaternion::new(0.9, 0.1, -0.2, 0.3)),
            translation: Vector3::new(0.5, -1.0, 2.0),
            points2d: vec![(10.5, 20.25, 3), (1.0, 2.0, -1)],
        }
    }

    #[test]
    fn test_read_cameras_bin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cameras.bin");
        let camera = Camera {
            camera_id: 2,
            model: CameraModelId::Pinhole,
            width: 640,
            height: 480,
            params: vec![800.0, 820.0, 320.0, 240.0],
        };
        write_cameras_bin(&path, &[camera]).unwrap();

        let cameras = read_cameras_bin(&path).unwrap();
        assert_eq!(cameras.len(), 1);
        assert_eq!(cameras[0].camera_id, 2);
        assert_eq!(cameras[0].model, CameraModelId::Pinhole);
        assert_eq!((cameras[0].width, cameras[0].height), (640, 480));
        assert_eq!(cameras[0].params, vec![800.0, 820.0, 320.0, 240.0]);
    }

    #[test]
    fn test_read_images_bin_keeps_raw_quaternion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("images.bin");
        write_images_bin(&path, &[sample_image()]).unwrap();

        let images = read_images_bin(&path).unwrap();
        assert_eq!(images.len(), 1);
        let image = &images[0];
        assert_eq!(image.image_id, 7);
        assert_eq!(image.camera_id, 2);
        assert_eq!(image.name, "frame_0007.png");
        let q = image.rotation.quaternion();
        assert_eq!([q.w, q.i, q.j, q.k], [0.9, 0.1, -0.2, 0.3]);
        assert_eq!(image.translation, Vector3::new(0.5, -1.0, 2.0));
        assert_eq!(image.points2d, vec![(10.5, 20.25, 3), (1.0, 2.0, -1)]);
    }

    #[test]
    fn test_read_points3d_bin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points3D.bin");
        let point = Point3D {
            point3d_id: 3,
            xyz: [1.0, 2.0, 3.0],
            rgb: [255, 128, 0],
            error: 0.5,
            track: vec![(7, 0)],
        };
        write_points3d_bin(&path, &[point]).unwrap();

        let points = read_points3d_bin(&path).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].rgb, [255, 128, 0]);
        assert_eq!(points[0].track, vec![(7, 0)]);
    }

    #[test]
    fn test_unknown_camera_model() {
        let mut buf = Vec::new();
        buf.extend(1u64.to_le_bytes());
        buf.extend(1u32.to_le_bytes());
        buf.extend(42i32.to_le_bytes());
        let err = parse_cameras(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, ColmapError::UnknownCameraModel(42)));
    }

    #[test]
    fn test_newer_camera_model() {
        let mut buf = Vec::new();
        buf.extend(1u64.to_le_bytes());
        buf.extend(3u32.to_le_bytes());
        buf.extend(12i32.to_le_bytes());
        buf.extend(640u64.to_le_bytes());
        buf.extend(480u64.to_le_bytes());
        for p in [500.0f64, 320.0, 240.0, 0.0] {
            buf.extend(p.to_le_bytes());
        }
        let cameras = parse_cameras(&mut buf.as_slice()).unwrap();
        assert_eq!(cameras[0].model, CameraModelId::SimpleDivision);
        assert_eq!(cameras[0].params, vec![500.0, 320.0, 240.0, 0.0]);
        assert_eq!(crate::camera::focal_lengths(&cameras[0]).unwrap(), (500.0, 500.0));
    }

    #[test]
    fn test_truncated_images_bin() {
        let mut buf = Vec::new();
        buf.extend(2u64.to_le_bytes());
        buf.extend(1u32.to_le_bytes());
        let err = parse_images(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, ColmapError::IoError(_)));
    }
}
