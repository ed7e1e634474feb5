use crate::render::quad_base_index;
use crate::{
    Atlas, AtlasAttachmentLoader, Bone, QUAD_TRIANGLES, QuadBatch, RegionAttachment,
    region_vertices,
};

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-4,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

fn square() -> RegionAttachment {
    RegionAttachment::builder("square")
        .size(2.0, 2.0)
        .untrimmed_region(2.0, 2.0)
        .uvs(0.0, 0.0, 1.0, 1.0, false)
        .build()
        .unwrap()
}

#[test]
fn region_vertices_pair_positions_with_uvs() {
    let attachment = square();
    let bone = Bone::from_local(10.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0);
    let vertices = region_vertices(&attachment, 0.0, 0.0, &bone, [1.0, 0.5, 0.25, 1.0]);

    let expected_positions = [[9.0, -1.0], [9.0, 1.0], [11.0, 1.0], [11.0, -1.0]];
    for (vertex, (position, uv)) in vertices
        .iter()
        .zip(expected_positions.iter().zip(attachment.uv_corners()))
    {
        assert_approx(vertex.position[0], position[0]);
        assert_approx(vertex.position[1], position[1]);
        assert_eq!(vertex.uv, uv);
        assert_eq!(vertex.color, [1.0, 0.5, 0.25, 1.0]);
    }
}

#[test]
fn quad_batch_offsets_indices_per_quad() {
    let attachment = square();
    let mut batch = QuadBatch::default();
    batch.push_region(&attachment, 0.0, 0.0, &Bone::IDENTITY, [1.0; 4]);
    batch.push_region(&attachment, 5.0, 0.0, &Bone::IDENTITY, [1.0; 4]);

    assert_eq!(batch.quad_count(), 2);
    assert_eq!(batch.vertices.len(), 8);
    assert_eq!(batch.indices, vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
    assert_approx(batch.vertices[4].position[0], 4.0);

    batch.clear();
    assert_eq!(batch.quad_count(), 0);
    assert!(batch.indices.is_empty());
}

#[test]
fn quad_batch_skips_transparent_quads() {
    let attachment = square();
    let mut batch = QuadBatch::default();
    batch.push_region(&attachment, 0.0, 0.0, &Bone::IDENTITY, [1.0, 1.0, 1.0, 0.0]);
    assert!(batch.vertices.is_empty());
    assert!(batch.indices.is_empty());
}

#[test]
fn quad_base_index_stops_at_u32_range() {
    assert_eq!(quad_base_index(0), Some(0));
    assert_eq!(quad_base_index(8), Some(8));
    assert_eq!(quad_base_index(u32::MAX as usize - 3), Some(u32::MAX - 3));
    assert_eq!(quad_base_index(u32::MAX as usize - 2), None);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn quad_base_index_rejects_lengths_past_u32() {
    assert_eq!(quad_base_index(u32::MAX as usize + 1), None);
    assert_eq!(quad_base_index(usize::MAX), None);
}

#[test]
fn quad_triangles_cover_both_halves() {
    let mut seen = [0usize; 4];
    for &i in &QUAD_TRIANGLES {
        seen[i as usize] += 1;
    }
    // The diagonal corners are shared by both triangles.
    assert_eq!(seen, [2, 1, 2, 1]);
}

#[test]
fn atlas_to_batch_end_to_end() {
    let atlas = Atlas::parse(
        r#"
skeleton.png
size: 256,256

sword
  bounds: 0, 0, 64, 16
  rotate: true
  offsets: 0, 0, 64, 16
"#,
    )
    .unwrap();
    let loader = AtlasAttachmentLoader::new(&atlas);
    let mut sword: RegionAttachment<usize> =
        loader.new_region_attachment("sword", "sword").unwrap();
    sword.set_renderer_object(atlas.region("sword").unwrap().page);
    sword.set_width(64.0);
    sword.set_height(16.0);
    sword.set_rotation(90.0);
    sword.update_offset();

    let hand = Bone::from_local(50.0, 50.0, 0.0, 1.0, 1.0, 0.0, 0.0);
    let mut batch = QuadBatch::default();
    batch.push_region(&sword, 0.0, 0.0, &hand, [1.0; 4]);

    // A 64x16 sword turned upright around the hand.
    let positions: Vec<[f32; 2]> = batch.vertices.iter().map(|v| v.position).collect();
    let expected = [[58.0, 18.0], [42.0, 18.0], [42.0, 82.0], [58.0, 82.0]];
    for (actual, expected) in positions.iter().zip(expected) {
        assert_approx(actual[0], expected[0]);
        assert_approx(actual[1], expected[1]);
    }

    // Rotated packing: the page rect is 16x64, and the bottom-left corner samples (u2, v2).
    assert_approx(batch.vertices[0].uv[0], 16.0 / 256.0);
    assert_approx(batch.vertices[0].uv[1], 64.0 / 256.0);
    assert_eq!(sword.renderer_object(), Some(&0));
}

#[cfg(feature = "bytemuck")]
#[test]
fn vertex_is_plain_old_data() {
    let vertex = crate::Vertex {
        position: [1.0, 2.0],
        uv: [0.5, 0.5],
        color: [1.0; 4],
    };
    let bytes: &[u8] = bytemuck::bytes_of(&vertex);
    assert_eq!(bytes.len(), std::mem::size_of::<f32>() * 8);
}
