use crate::domain::hlo::{PrimitiveType, ShapeProto};

/// Tuple elements are stored as pointers in the tuple's own buffer.
const POINTER_SIZE: i64 = 8;

fn element_type(shape: &ShapeProto) -> PrimitiveType {
    PrimitiveType::try_from(shape.element_type).unwrap_or(PrimitiveType::Invalid)
}

pub fn is_tuple(shape: &ShapeProto) -> bool {
    element_type(shape) == PrimitiveType::Tuple
}

/// Human readable XLA form, e.g. `f32[8,128]{1,0}` or `(s32[], f32[4]{0})`.
pub fn shape_to_string(shape: &ShapeProto) -> String {
    if is_tuple(shape) {
        let elements: Vec<String> = shape.tuple_shapes.iter().map(shape_to_string).collect();
        return format!("({})", elements.join(", "));
    }

    let dims: Vec<String> = shape.dimensions.iter().map(|d| d.to_string()).collect();
    let mut text = format!("{}[{}]", element_type(shape).short_name(), dims.join(","));
    if let Some(layout) = &shape.layout {
        if !shape.dimensions.is_empty() {
            let minor_to_major: Vec<String> =
                layout.minor_to_major.iter().map(|d| d.to_string()).collect();
            text.push_str(&format!("{{{}}}", minor_to_major.join(",")));
        }
    }
    text
}

/// Bytes the shape needs without layout padding; `None` when the size
/// does not fit in an `i64`.
pub fn unpadded_byte_size(shape: &ShapeProto) -> Option<i64> {
    if is_tuple(shape) {
        return i64::try_from(shape.tuple_shapes.len())
            .ok()?
            .checked_mul(POINTER_SIZE);
    }
    let elements = shape
        .dimensions
        .iter()
        .try_fold(1i64, |acc, d| acc.checked_mul((*d).max(0)))?;
    let bits = elements.checked_mul(element_type(shape).bit_width())?;
    Some(bits.checked_add(7)? / 8)
}

/// Walks tuple elements along `index`.
pub fn subshape<'a>(shape: &'a ShapeProto, index: &[i64]) -> Option<&'a ShapeProto> {
    let mut current = shape;
    for i in index {
        let i = usize::try_from(*i).ok()?;
        current = current.tuple_shapes.get(i)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hlo::LayoutProto;

    fn array(element_type: PrimitiveType, dims: &[i64]) -> ShapeProto {
        ShapeProto {
            element_type: element_type as i32,
            dimensions: dims.to_vec(),
            tuple_shapes: vec![],
            layout: Some(LayoutProto {
                minor_to_major: (0..dims.len() as i64).rev().collect(),
            }),
        }
    }

    #[test]
    fn test_array_string() {
        assert_eq!(shape_to_string(&array(PrimitiveType::F32, &[8, 128])), "f32[8,128]{1,0}");
        assert_eq!(shape_to_string(&array(PrimitiveType::S32, &[])), "s32[]");
    }

    #[test]
    fn test_tuple_string_and_size() {
        let tuple = ShapeProto {
            element_type: PrimitiveType::Tuple as i32,
            tuple_shapes: vec![array(PrimitiveType::Bf16, &[4]), array(PrimitiveType::Pred, &[])],
            ..Default::default()
        };
        assert_eq!(shape_to_string(&tuple), "(bf16[4]{0}, pred[])");
        assert_eq!(unpadded_byte_size(&tuple), Some(16));
        assert_eq!(unpadded_byte_size(subshape(&tuple, &[0]).unwrap()), Some(8));
        assert!(subshape(&tuple, &[2]).is_none());
    }

    #[test]
    fn test_sub_byte_types_round_up() {
        assert_eq!(unpadded_byte_size(&array(PrimitiveType::S4, &[3])), Some(2));
        assert_eq!(
            unpadded_byte_size(&array(PrimitiveType::F32, &[1024, 1024])),
            Some(4 << 20)
        );
    }

    #[test]
    fn test_oversized_shape_has_no_size() {
        assert_eq!(unpadded_byte_size(&array(PrimitiveType::F32, &[1 << 40, 1 << 40])), None);
        assert_eq!(unpadded_byte_size(&array(PrimitiveType::F64, &[1 << 31, 1 << 30])), None);
    }
}
