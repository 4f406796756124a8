use gl::types::*;
use std::{mem, ptr, slice};

#[derive(Debug)]
pub struct VertexArrayObject {
    id: GLuint,
}

impl VertexArrayObject {
    pub fn new() -> Self {
        let mut id = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut id);
        }
        VertexArrayObject { id }
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindVertexArray(self.id);
        }
    }

    pub fn configure_attribute(&self, index: u32, count: u32, total: u32, offset: u32) {
        self.bind();
        let float_size = mem::size_of::<GLfloat>() as u32;
        unsafe {
            gl::EnableVertexAttribArray(index);
            gl::VertexAttribPointer(
                index,
                count as i32,
                gl::FLOAT,
                gl::FALSE,
                (total * float_size) as i32,
                (offset * float_size) as *const GLvoid,
            );
        }
    }
}

impl Default for VertexArrayObject {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for VertexArrayObject {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.id);
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub enum DrawingHint {
    StreamDraw,
    StaticDraw,
    DynamicDraw,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BufferKind {
    Array,
    Element,
}

#[derive(Debug)]
pub struct Buffer {
    id: GLuint,
    kind: BufferKind,
    data: Vec<u8>,
}

impl Buffer {
    pub fn new(kind: BufferKind) -> Self {
        let mut id = 0;
        unsafe {
            gl::GenBuffers(1, &mut id);
        }
        Buffer {
            id,
            kind,
            data: Vec::new(),
        }
    }

    pub fn add_data<T: Copy>(&mut self, data: &[T]) {
        let len = mem::size_of::<T>() * data.len();
        let byte_slice = unsafe { slice::from_raw_parts(data.as_ptr() as *const u8, len) };
        self.data.extend_from_slice(byte_slice);
    }

    pub fn upload(&mut self, vao: &VertexArrayObject, hint: DrawingHint) {
        vao.bind();
        self.bind();
        unsafe {
            gl::BufferData(
                self.kind(),
                self.data.len() as GLsizeiptr,
                self.data.as_ptr() as *const GLvoid,
                Buffer::map_hint(hint),
            );
        }
        self.data.clear();
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindBuffer(self.kind(), self.id);
        }
    }

    fn kind(&self) -> GLuint {
        match self.kind {
            BufferKind::Array => gl::ARRAY_BUFFER,
            BufferKind::Element => gl::ELEMENT_ARRAY_BUFFER,
        }
    }

    fn map_hint(drawing_hint: DrawingHint) -> GLuint {
        match drawing_hint {
            DrawingHint::StreamDraw => gl::STREAM_DRAW,
            DrawingHint::StaticDraw => gl::STATIC_DRAW,
            DrawingHint::DynamicDraw => gl::DYNAMIC_DRAW,
        }
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.id);
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
}

impl Primitive {
    fn mode(self) -> GLenum {
        match self {
            Primitive::Triangles => gl::TRIANGLES,
            Primitive::TriangleStrip => gl::TRIANGLE_STRIP,
        }
    }
}

/// Interleaved float vertices with an optional index buffer.
///
/// `attributes` lists the component count of each vertex attribute in
/// binding order, e.g. `&[3, 3]` for position + normal.
pub struct GeometryBuffer {
    vao: VertexArrayObject,
    _vertex_buffer: Buffer,
    index_buffer: Option<Buffer>,
    vertex_count: usize,
    index_count: usize,
    primitive: Primitive,
}

impl GeometryBuffer {
    pub fn new(vertices: &[f32], indices: Option<&[u32]>, attributes: &[u32]) -> Self {
        let vao = VertexArrayObject::new();

        let mut vertex_buffer = Buffer::new(BufferKind::Array);
        vertex_buffer.add_data(vertices);
        vertex_buffer.upload(&vao, DrawingHint::StaticDraw);

        let index_buffer = indices.map(|indices| {
            let mut buffer = Buffer::new(BufferKind::Element);
            buffer.add_data(indices);
            buffer.upload(&vao, DrawingHint::StaticDraw);
            buffer
        });

        let stride: u32 = attributes.iter().sum();
        let mut offset = 0;
        for (index, count) in attributes.iter().enumerate() {
            vao.configure_attribute(index as u32, *count, stride, offset);
            offset += count;
        }

        let vertex_count = if stride == 0 {
            0
        } else {
            vertices.len() / stride as usize
        };

        Self {
            vao,
            _vertex_buffer: vertex_buffer,
            index_buffer,
            vertex_count,
            index_count: indices.map_or(0, |indices| indices.len()),
            primitive: Primitive::Triangles,
        }
    }

    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitive = primitive;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn bind(&self) {
        self.vao.bind();
    }

    pub fn draw(&self) {
        self.bind();
        unsafe {
            match self.index_buffer.as_ref() {
                Some(index_buffer) => {
                    index_buffer.bind();
                    gl::DrawElements(
                        self.primitive.mode(),
                        self.index_count as i32,
                        gl::UNSIGNED_INT,
                        ptr::null(),
                    );
                }
                None => gl::DrawArrays(self.primitive.mode(), 0, self.vertex_count as i32),
            }
        }
    }
}
