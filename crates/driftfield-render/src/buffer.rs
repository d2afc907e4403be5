//! Vertex layout and GPU mesh buffers.

use bytemuck::{Pod, Zeroable};
use driftfield_mesh::Mesh;
use wgpu::util::DeviceExt;

/// Interleaved position, normal and UV.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexPositionNormalUv {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave a CPU mesh. Missing normals or UVs read as zero.
pub fn interleave(mesh: &Mesh) -> Vec<VertexPositionNormalUv> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| VertexPositionNormalUv {
            position: p.to_array(),
            normal: mesh.normals.get(i).map_or([0.0; 3], |n| n.to_array()),
            uv: mesh.uvs.get(i).copied().unwrap_or([0.0; 2]),
        })
        .collect()
}

/// A mesh uploaded to the GPU.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertices = interleave(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Bind the buffers and draw every index.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::headless_device;
    use driftfield_mesh::{cuboid, dodecahedron};

    #[test]
    fn test_layout_stride() {
        let layout = VertexPositionNormalUv::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[2].offset, 24);
    }

    #[test]
    fn test_interleave_copies_attributes() {
        let mesh = cuboid(2.0, 1.0, 1.0);
        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), mesh.vertex_count());
        assert_eq!(vertices[3].position, mesh.positions[3].to_array());
        assert_eq!(vertices[3].normal, mesh.normals[3].to_array());
        assert_eq!(vertices[3].uv, mesh.uvs[3]);
    }

    #[test]
    fn test_interleave_tolerates_missing_normals() {
        let mut mesh = dodecahedron(1.0, 0);
        mesh.normals.clear();
        let vertices = interleave(&mesh);
        assert!(vertices.iter().all(|v| v.normal == [0.0; 3]));
    }

    #[test]
    fn test_upload_index_count() {
        let Some((device, _queue)) = headless_device() else {
            return;
        };
        let mesh = dodecahedron(1.0, 1);
        let gpu = GpuMesh::upload(&device, "rock", &mesh);
        assert_eq!(gpu.index_count as usize, mesh.indices.len());
    }
}
