use crate::{AtlasPage, AtlasRegion, BoneTransform, Error};

/// Attachment that displays a texture region as a quad bound to a single bone.
///
/// Corner data is stored as four interleaved `(x, y)` pairs in the winding order bottom-left,
/// top-left, top-right, bottom-right (see [`RegionAttachment::X1`] and friends). The derived
/// `offset` and `uvs` arrays are only written by [`update_offset`](Self::update_offset) and
/// [`set_uvs`](Self::set_uvs); callers that change placement or region fields must re-run them.
#[derive(Clone, Debug)]
pub struct RegionAttachment<R = ()> {
    name: String,
    path: String,

    x: f32,
    y: f32,
    rotation: f32,
    scale_x: f32,
    scale_y: f32,
    width: f32,
    height: f32,

    // Pixels stripped from the bottom left, unrotated.
    region_offset_x: f32,
    region_offset_y: f32,
    // Unrotated, stripped size.
    region_width: f32,
    region_height: f32,
    // Unrotated, unstripped size.
    region_original_width: f32,
    region_original_height: f32,

    offset: [f32; 8],
    uvs: [f32; 8],

    renderer_object: Option<R>,
}

impl<R> RegionAttachment<R> {
    pub const X1: usize = 0;
    pub const Y1: usize = 1;
    pub const X2: usize = 2;
    pub const Y2: usize = 3;
    pub const X3: usize = 4;
    pub const Y3: usize = 5;
    pub const X4: usize = 6;
    pub const Y4: usize = 7;

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            width: 0.0,
            height: 0.0,
            region_offset_x: 0.0,
            region_offset_y: 0.0,
            region_width: 0.0,
            region_height: 0.0,
            region_original_width: 0.0,
            region_original_height: 0.0,
            offset: [0.0; 8],
            uvs: [0.0; 8],
            renderer_object: None,
        }
    }

    pub fn builder(name: impl Into<String>) -> RegionAttachmentBuilder<R> {
        RegionAttachmentBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Atlas lookup key. Defaults to the attachment name.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Local rotation in degrees.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn set_scale_x(&mut self, scale_x: f32) {
        self.scale_x = scale_x;
    }

    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    pub fn set_scale_y(&mut self, scale_y: f32) {
        self.scale_y = scale_y;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    pub fn region_offset_x(&self) -> f32 {
        self.region_offset_x
    }

    pub fn set_region_offset_x(&mut self, value: f32) {
        self.region_offset_x = value;
    }

    pub fn region_offset_y(&self) -> f32 {
        self.region_offset_y
    }

    pub fn set_region_offset_y(&mut self, value: f32) {
        self.region_offset_y = value;
    }

    pub fn region_width(&self) -> f32 {
        self.region_width
    }

    pub fn set_region_width(&mut self, value: f32) {
        self.region_width = value;
    }

    pub fn region_height(&self) -> f32 {
        self.region_height
    }

    pub fn set_region_height(&mut self, value: f32) {
        self.region_height = value;
    }

    pub fn region_original_width(&self) -> f32 {
        self.region_original_width
    }

    pub fn set_region_original_width(&mut self, value: f32) {
        self.region_original_width = value;
    }

    pub fn region_original_height(&self) -> f32 {
        self.region_original_height
    }

    pub fn set_region_original_height(&mut self, value: f32) {
        self.region_original_height = value;
    }

    /// Bone-local quad corners, as of the last [`update_offset`](Self::update_offset).
    pub fn offset(&self) -> &[f32; 8] {
        &self.offset
    }

    /// Texture coordinates per corner, as of the last [`set_uvs`](Self::set_uvs).
    pub fn uvs(&self) -> &[f32; 8] {
        &self.uvs
    }

    pub fn corners(&self) -> [[f32; 2]; 4] {
        pairs(&self.offset)
    }

    pub fn uv_corners(&self) -> [[f32; 2]; 4] {
        pairs(&self.uvs)
    }

    pub fn renderer_object(&self) -> Option<&R> {
        self.renderer_object.as_ref()
    }

    pub fn set_renderer_object(&mut self, renderer_object: R) {
        self.renderer_object = Some(renderer_object);
    }

    pub fn take_renderer_object(&mut self) -> Option<R> {
        self.renderer_object.take()
    }

    /// Writes the texture coordinates of the region `(u, v)`..`(u2, v2)`.
    ///
    /// `rotate` means the atlas packer stored the region rotated 90 degrees; every coordinate then
    /// moves one corner forward in the winding order so the image displays upright.
    pub fn set_uvs(&mut self, u: f32, v: f32, u2: f32, v2: f32, rotate: bool) {
        let corners = [[u, v2], [u, v], [u2, v], [u2, v2]];
        let shift = usize::from(rotate);
        for (i, [cu, cv]) in corners.into_iter().enumerate() {
            let corner = (i + shift) % 4;
            self.uvs[corner * 2] = cu;
            self.uvs[corner * 2 + 1] = cv;
        }
    }

    /// Recomputes the bone-local quad corners from the placement and region fields.
    ///
    /// `region_original_width`/`region_original_height` must be non-zero; otherwise the corners
    /// come out non-finite.
    pub fn update_offset(&mut self) {
        let width = self.width;
        let height = self.height;
        let scale_x = self.scale_x;
        let scale_y = self.scale_y;
        let region_scale_x = width / self.region_original_width * scale_x;
        let region_scale_y = height / self.region_original_height * scale_y;
        let local_x = -width / 2.0 * scale_x + self.region_offset_x * region_scale_x;
        let local_y = -height / 2.0 * scale_y + self.region_offset_y * region_scale_y;
        let local_x2 = local_x + self.region_width * region_scale_x;
        let local_y2 = local_y + self.region_height * region_scale_y;

        let radians = self.rotation.to_radians();
        let cos = radians.cos();
        let sin = radians.sin();

        let x = self.x;
        let y = self.y;
        let local_x_cos = local_x * cos + x;
        let local_x_sin = local_x * sin;
        let local_y_cos = local_y * cos + y;
        let local_y_sin = local_y * sin;
        let local_x2_cos = local_x2 * cos + x;
        let local_x2_sin = local_x2 * sin;
        let local_y2_cos = local_y2 * cos + y;
        let local_y2_sin = local_y2 * sin;

        let offset = &mut self.offset;
        offset[Self::X1] = local_x_cos - local_y_sin;
        offset[Self::Y1] = local_y_cos + local_x_sin;
        offset[Self::X2] = local_x_cos - local_y2_sin;
        offset[Self::Y2] = local_y2_cos + local_x_sin;
        offset[Self::X3] = local_x2_cos - local_y2_sin;
        offset[Self::Y3] = local_y2_cos + local_x2_sin;
        offset[Self::X4] = local_x2_cos - local_y_sin;
        offset[Self::Y4] = local_y_cos + local_x2_sin;
    }

    /// Projects the quad into world space through `bone`.
    ///
    /// `(x, y)` is added after the bone's linear map, alongside the bone's world position.
    ///
    /// # Panics
    ///
    /// Panics if `vertices` holds fewer than 8 floats.
    pub fn compute_world_vertices<B>(&self, x: f32, y: f32, bone: &B, vertices: &mut [f32])
    where
        B: BoneTransform + ?Sized,
    {
        assert!(
            vertices.len() >= 8,
            "region attachment '{}' needs 8 output floats, got {}",
            self.name,
            vertices.len()
        );

        let x = x + bone.world_x();
        let y = y + bone.world_y();
        let m00 = bone.m00();
        let m01 = bone.m01();
        let m10 = bone.m10();
        let m11 = bone.m11();

        for (out, corner) in vertices[..8]
            .chunks_exact_mut(2)
            .zip(self.offset.chunks_exact(2))
        {
            let ox = corner[0];
            let oy = corner[1];
            out[0] = ox * m00 + oy * m01 + x;
            out[1] = ox * m10 + oy * m11 + y;
        }
    }

    pub fn world_vertices<B>(&self, x: f32, y: f32, bone: &B) -> [f32; 8]
    where
        B: BoneTransform + ?Sized,
    {
        let mut out = [0.0; 8];
        self.compute_world_vertices(x, y, bone, &mut out);
        out
    }

    /// Copies an atlas region's packing metadata and texture coordinates into the attachment.
    ///
    /// Placement is untouched, so [`update_offset`](Self::update_offset) still has to run once the
    /// attachment's size and transform are known.
    pub fn set_region(&mut self, region: &AtlasRegion, page: &AtlasPage) {
        let coords = region.texture_coords(page);
        self.set_uvs(coords.u, coords.v, coords.u2, coords.v2, coords.rotate);

        self.region_offset_x = region.offset_x as f32;
        self.region_offset_y = region.offset_y as f32;
        self.region_width = region.width as f32;
        self.region_height = region.height as f32;
        self.region_original_width = region.original_width as f32;
        self.region_original_height = region.original_height as f32;
    }
}

fn pairs(values: &[f32; 8]) -> [[f32; 2]; 4] {
    [
        [values[0], values[1]],
        [values[2], values[3]],
        [values[4], values[5]],
        [values[6], values[7]],
    ]
}

/// Validating constructor for [`RegionAttachment`].
///
/// [`build`](Self::build) checks the inputs, then computes `offset` and `uvs` once, so the result
/// never carries stale derived data.
#[derive(Clone, Debug)]
pub struct RegionAttachmentBuilder<R = ()> {
    attachment: RegionAttachment<R>,
    uvs: Option<(f32, f32, f32, f32, bool)>,
}

impl<R> RegionAttachmentBuilder<R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            attachment: RegionAttachment::new(name),
            uvs: None,
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.attachment.path = path.into();
        self
    }

    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.attachment.x = x;
        self.attachment.y = y;
        self
    }

    pub fn rotation(mut self, rotation: f32) -> Self {
        self.attachment.rotation = rotation;
        self
    }

    pub fn scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.attachment.scale_x = scale_x;
        self.attachment.scale_y = scale_y;
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.attachment.width = width;
        self.attachment.height = height;
        self
    }

    /// Packed region geometry: trim offset, packed size and original size, in atlas pixels.
    pub fn region(
        mut self,
        offset_x: f32,
        offset_y: f32,
        width: f32,
        height: f32,
        original_width: f32,
        original_height: f32,
    ) -> Self {
        let a = &mut self.attachment;
        a.region_offset_x = offset_x;
        a.region_offset_y = offset_y;
        a.region_width = width;
        a.region_height = height;
        a.region_original_width = original_width;
        a.region_original_height = original_height;
        self
    }

    /// Untrimmed region of the given size; shorthand for `region(0, 0, w, h, w, h)`.
    pub fn untrimmed_region(self, width: f32, height: f32) -> Self {
        self.region(0.0, 0.0, width, height, width, height)
    }

    pub fn uvs(mut self, u: f32, v: f32, u2: f32, v2: f32, rotate: bool) -> Self {
        self.uvs = Some((u, v, u2, v2, rotate));
        self
    }

    /// Takes region metadata and texture coordinates from an atlas region.
    pub fn atlas_region(mut self, region: &AtlasRegion, page: &AtlasPage) -> Self {
        self.attachment.set_region(region, page);
        self.uvs = None;
        self
    }

    pub fn renderer_object(mut self, renderer_object: R) -> Self {
        self.attachment.renderer_object = Some(renderer_object);
        self
    }

    pub fn build(mut self) -> Result<RegionAttachment<R>, Error> {
        let a = &self.attachment;
        for (field, value) in [
            ("x", a.x),
            ("y", a.y),
            ("rotation", a.rotation),
            ("scaleX", a.scale_x),
            ("scaleY", a.scale_y),
            ("width", a.width),
            ("height", a.height),
            ("regionOffsetX", a.region_offset_x),
            ("regionOffsetY", a.region_offset_y),
            ("regionWidth", a.region_width),
            ("regionHeight", a.region_height),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidValue {
                    message: format!("region attachment '{}': {field} is {value}", a.name),
                });
            }
        }
        for (field, value) in [
            ("regionOriginalWidth", a.region_original_width),
            ("regionOriginalHeight", a.region_original_height),
        ] {
            if !value.is_finite() || value == 0.0 {
                return Err(Error::InvalidValue {
                    message: format!(
                        "region attachment '{}': {field} must be finite and non-zero, got {value}",
                        a.name
                    ),
                });
            }
        }

        if let Some((u, v, u2, v2, rotate)) = self.uvs {
            self.attachment.set_uvs(u, v, u2, v2, rotate);
        }
        self.attachment.update_offset();
        Ok(self.attachment)
    }
}
