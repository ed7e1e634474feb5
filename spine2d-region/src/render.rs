use crate::{BoneTransform, RegionAttachment};

/// Two triangles covering a region quad, indexing corners in winding order.
pub const QUAD_TRIANGLES: [u16; 6] = [0, 1, 2, 2, 3, 0];

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

/// Builds the four vertices of a region quad projected through `bone`.
pub fn region_vertices<R, B>(
    attachment: &RegionAttachment<R>,
    x: f32,
    y: f32,
    bone: &B,
    color: [f32; 4],
) -> [Vertex; 4]
where
    B: BoneTransform + ?Sized,
{
    let positions = attachment.world_vertices(x, y, bone);
    let uvs = attachment.uvs();
    std::array::from_fn(|corner| Vertex {
        position: [positions[corner * 2], positions[corner * 2 + 1]],
        uv: [uvs[corner * 2], uvs[corner * 2 + 1]],
        color,
    })
}

/// Indexed vertex batch of region quads, reused across frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadBatch {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl QuadBatch {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Appends one region quad. Fully transparent quads are skipped.
    ///
    /// # Panics
    ///
    /// Panics if the batch would hold more vertices than `u32` indices can address.
    pub fn push_region<R, B>(
        &mut self,
        attachment: &RegionAttachment<R>,
        x: f32,
        y: f32,
        bone: &B,
        color: [f32; 4],
    ) where
        B: BoneTransform + ?Sized,
    {
        if color[3] <= 0.0 {
            return;
        }

        let Some(base) = quad_base_index(self.vertices.len()) else {
            panic!(
                "quad batch is full: {} vertices exceed the u32 index range",
                self.vertices.len()
            );
        };
        self.vertices
            .extend(region_vertices(attachment, x, y, bone, color));
        self.indices
            .extend(QUAD_TRIANGLES.iter().map(|&i| base + u32::from(i)));
    }
}

/// First index of a quad appended after `len` vertices, if all four corners stay addressable.
pub(crate) fn quad_base_index(len: usize) -> Option<u32> {
    let base = u32::try_from(len).ok()?;
    base.checked_add(3)?;
    Some(base)
}
