//! Image-name decoding and tensor conversion helpers.

use crate::{common::*, error::DatasetError};
use image::RgbImage;

/// Fields encoded in an H36M sequence image name such as
/// `s_01_act_02_subact_01_ca_01_000001.jpg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName {
    /// Subject directory name, e.g. `S1`.
    pub subject: String,
    pub action: u32,
    pub subaction: u32,
    pub camera: u32,
    pub frame: u32,
}

/// Decode an image identifier into its subject/action/camera/frame fields.
pub fn decode_image_name(name: &str) -> Result<ImageName> {
    let malformed = || {
        Error::from(DatasetError::MalformedImageName {
            name: name.to_owned(),
        })
    };

    let stem = name.split('.').next().unwrap_or(name);
    let tokens: Vec<_> = stem.split('_').collect();

    let (subject, action, subaction, camera, frame) = match tokens.as_slice() {
        ["s", subject, "act", action, "subact", subaction, "ca", camera, frame] => {
            (subject, action, subaction, camera, frame)
        }
        _ => return Err(malformed()),
    };

    let subject: u32 = subject.parse().map_err(|_| malformed())?;

    Ok(ImageName {
        subject: format!("S{}", subject),
        action: action.parse().map_err(|_| malformed())?,
        subaction: subaction.parse().map_err(|_| malformed())?,
        camera: camera.parse().map_err(|_| malformed())?,
        frame: frame.parse().map_err(|_| malformed())?,
    })
}

/// Convert an RGB image into a CHW float tensor with values in `[0, 1]`.
pub fn to_chw_tensor(image: &RgbImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn((3, height as usize, width as usize), |(channel, y, x)| {
        image.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn decode_well_formed_name() {
        let name = decode_image_name("s_01_act_02_subact_01_ca_03_000123.jpg").unwrap();
        assert_eq!(
            name,
            ImageName {
                subject: "S1".to_owned(),
                action: 2,
                subaction: 1,
                camera: 3,
                frame: 123,
            }
        );
    }

    #[test]
    fn decode_keeps_two_digit_subjects() {
        let name = decode_image_name("s_11_act_16_subact_02_ca_04_002345.jpg").unwrap();
        assert_eq!(name.subject, "S11");
        assert_eq!(name.camera, 4);
    }

    #[test]
    fn malformed_names_are_rejected() {
        for name in [
            "act_02_subact_01_ca_03_000123.jpg",
            "s_xx_act_02_subact_01_ca_03_000123.jpg",
            "s_01_act_02.jpg",
            "",
        ] {
            let error = decode_image_name(name).unwrap_err();
            assert!(matches!(
                error.downcast_ref::<DatasetError>(),
                Some(DatasetError::MalformedImageName { .. })
            ));
        }
    }

    #[test]
    fn chw_tensor_layout_and_range() {
        let mut image = RgbImage::new(4, 2);
        image.put_pixel(3, 1, Rgb([255, 51, 0]));
        let tensor = to_chw_tensor(&image);

        assert_eq!(tensor.dim(), (3, 2, 4));
        assert_eq!(tensor[[0, 1, 3]], 1.0);
        assert_eq!(tensor[[1, 1, 3]], 0.2);
        assert_eq!(tensor[[2, 1, 3]], 0.0);
        assert_eq!(tensor[[0, 0, 0]], 0.0);
    }
}
