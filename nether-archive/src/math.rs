//! glam vector, quaternion and matrix support
//!
//! Each type is a composite whose body is its components in index order.
//! Matrices are column-major and quaternions are `x, y, z, w`. Runs of these
//! types are plain data, so binary codecs store a whole run as one blob with
//! the same bytes the per-component path would produce.

use glam::{IVec2, IVec3, IVec4, Mat3, Mat4, Quat, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

use crate::archive::{Reader, Writer};
use crate::error::Result;
use crate::serializable::Serializable;

macro_rules! impl_serializable_components {
    ($($ty:ident: [$scalar:ty; $n:literal], $to:ident, $from:ident $(, $by_ref:tt)?;)*) => {
        $(
            impl Serializable for $ty {
                fn type_name() -> &'static str {
                    stringify!($ty)
                }

                fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
                    for component in self.$to() {
                        writer.write(&component)?;
                    }
                    Ok(())
                }

                fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
                    let mut components = [<$scalar>::default(); $n];
                    for component in components.iter_mut() {
                        reader.read(component)?;
                    }
                    *self = $ty::$from($($by_ref)? components);
                    Ok(())
                }

                fn run_bytes(elements: &[Self]) -> Option<&[u8]> {
                    Some(bytemuck::cast_slice(elements))
                }

                fn run_bytes_mut(elements: &mut [Self]) -> Option<&mut [u8]> {
                    Some(bytemuck::cast_slice_mut(elements))
                }
            }
        )*
    };
}

impl_serializable_components! {
    Vec2: [f32; 2], to_array, from_array;
    Vec3: [f32; 3], to_array, from_array;
    Vec4: [f32; 4], to_array, from_array;
    IVec2: [i32; 2], to_array, from_array;
    IVec3: [i32; 3], to_array, from_array;
    IVec4: [i32; 4], to_array, from_array;
    UVec2: [u32; 2], to_array, from_array;
    UVec3: [u32; 3], to_array, from_array;
    UVec4: [u32; 4], to_array, from_array;
    Quat: [f32; 4], to_array, from_array;
    Mat3: [f32; 9], to_cols_array, from_cols_array, &;
    Mat4: [f32; 16], to_cols_array, from_cols_array, &;
}
