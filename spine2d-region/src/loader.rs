use crate::{Atlas, Error, RegionAttachment};

/// Creates region attachments backed by regions of a texture atlas.
#[derive(Copy, Clone, Debug)]
pub struct AtlasAttachmentLoader<'a> {
    atlas: &'a Atlas,
}

impl<'a> AtlasAttachmentLoader<'a> {
    pub fn new(atlas: &'a Atlas) -> Self {
        Self { atlas }
    }

    pub fn atlas(&self) -> &'a Atlas {
        self.atlas
    }

    /// Creates an attachment whose region metadata and uvs come from the atlas region at `path`.
    ///
    /// Placement is left at its defaults; set it and call
    /// [`RegionAttachment::update_offset`] before projecting.
    pub fn new_region_attachment<R>(
        &self,
        name: &str,
        path: &str,
    ) -> Result<RegionAttachment<R>, Error> {
        let (region, page) = self.atlas.find(path)?;

        let mut attachment = RegionAttachment::new(name);
        attachment.set_path(path);
        attachment.set_region(region, page);

        // The atlas parser defaults orig to the packed size, so zero here means an empty region.
        if region.original_width == 0 || region.original_height == 0 {
            log::warn!(
                "atlas region '{}' has zero original size; using packed size {}x{}",
                region.name,
                region.width,
                region.height
            );
            attachment.set_region_original_width(region.width.max(1) as f32);
            attachment.set_region_original_height(region.height.max(1) as f32);
        }

        log::debug!(
            "created region attachment '{name}' from '{path}' on page '{}'",
            page.name
        );
        Ok(attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATLAS: &str = r#"
page.png
size: 64,32

head
  bounds: 8, 4, 16, 8
  offsets: 2, 1, 20, 10
arm
  bounds: 32, 0, 4, 12
  rotate: true
empty
  bounds: 0, 0, 0, 0
"#;

    fn assert_approx(actual: f32, expected: f32) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= 1.0e-6,
            "expected {expected}, got {actual} (diff {diff})"
        );
    }

    #[test]
    fn loader_copies_region_metadata_and_uvs() {
        let atlas = Atlas::parse(ATLAS).unwrap();
        let loader = AtlasAttachmentLoader::new(&atlas);
        assert!(std::ptr::eq(loader.atlas(), &atlas));

        let head: RegionAttachment = loader.new_region_attachment("head-slot", "head").unwrap();
        assert_eq!(head.name(), "head-slot");
        assert_eq!(head.path(), "head");
        assert_approx(head.region_offset_x(), 2.0);
        assert_approx(head.region_offset_y(), 1.0);
        assert_approx(head.region_width(), 16.0);
        assert_approx(head.region_height(), 8.0);
        assert_approx(head.region_original_width(), 20.0);
        assert_approx(head.region_original_height(), 10.0);

        // u = 8/64, v = 4/32, u2 = 24/64, v2 = 12/32.
        let expected = [0.125, 0.375, 0.125, 0.125, 0.375, 0.125, 0.375, 0.375];
        for (actual, expected) in head.uvs().iter().copied().zip(expected) {
            assert_approx(actual, expected);
        }
    }

    #[test]
    fn loader_rotated_region_shifts_uv_corners() {
        let atlas = Atlas::parse(ATLAS).unwrap();
        let loader = AtlasAttachmentLoader::new(&atlas);

        let arm: RegionAttachment = loader.new_region_attachment("arm", "arm").unwrap();
        // Packed 12x4 on the page: u2 = 44/64, v2 = 4/32.
        let [bl, tl, tr, br] = arm.uv_corners();
        assert_approx(tl[0], 0.5);
        assert_approx(tl[1], 0.125);
        assert_approx(tr[0], 0.5);
        assert_approx(tr[1], 0.0);
        assert_approx(br[0], 0.6875);
        assert_approx(br[1], 0.0);
        assert_approx(bl[0], 0.6875);
        assert_approx(bl[1], 0.125);
    }

    #[test]
    fn loader_guards_zero_original_size() {
        let atlas = Atlas::parse(ATLAS).unwrap();
        let loader = AtlasAttachmentLoader::new(&atlas);

        let mut empty: RegionAttachment = loader.new_region_attachment("empty", "empty").unwrap();
        assert_approx(empty.region_original_width(), 1.0);
        assert_approx(empty.region_original_height(), 1.0);

        empty.set_width(10.0);
        empty.set_height(10.0);
        empty.update_offset();
        assert!(empty.offset().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn loader_reports_unknown_path() {
        let atlas = Atlas::parse(ATLAS).unwrap();
        let loader = AtlasAttachmentLoader::new(&atlas);
        let err = loader
            .new_region_attachment::<()>("leg", "leg")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownRegion { ref name } if name == "leg"));
    }
}
