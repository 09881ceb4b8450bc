//! Conversions between Arrow arrays and tabula columns at the Parquet boundary.

use std::sync::Arc;

use arrow_array::types::{
    Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type, UInt32Type,
    UInt64Type, UInt8Type,
};
use arrow_array::{
    Array, ArrayRef, ArrowPrimitiveType, BooleanArray, Decimal128Array, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, LargeStringArray, PrimitiveArray, RecordBatch,
    RecordBatchOptions, StringArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow_schema::{DataType as ArrowDataType, Field, Schema as ArrowSchema};
use tabula_core::column::{Column, ColumnData};
use tabula_core::table::Table;
use tabula_core::types::{ElementType, Scalar};

use crate::error::{Error, Result};

/// Element type for an Arrow type the readers understand without an override.
pub fn element_type_of(dt: &ArrowDataType) -> Option<ElementType> {
    let ty = match dt {
        ArrowDataType::Boolean => ElementType::Bool,
        ArrowDataType::Int8 => ElementType::Int8,
        ArrowDataType::Int16 => ElementType::Int16,
        ArrowDataType::Int32 => ElementType::Int32,
        ArrowDataType::Int64 => ElementType::Int64,
        ArrowDataType::UInt8 => ElementType::UInt8,
        ArrowDataType::UInt16 => ElementType::UInt16,
        ArrowDataType::UInt32 => ElementType::UInt32,
        ArrowDataType::UInt64 => ElementType::UInt64,
        ArrowDataType::Float32 => ElementType::Float32,
        ArrowDataType::Float64 => ElementType::Float64,
        ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 => ElementType::Object,
        _ => return None,
    };
    Some(ty)
}

fn downcast<'a, A: Array + 'static>(array: &'a ArrayRef) -> Result<&'a A> {
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        Error::Other(format!("unexpected array layout for {}", array.data_type()))
    })
}

fn primitive<T: ArrowPrimitiveType>(array: &ArrayRef) -> Result<Vec<T::Native>> {
    Ok(downcast::<PrimitiveArray<T>>(array)?.values().to_vec())
}

/// Convert one Arrow array to a column.
///
/// With an override the values go through `Scalar` and are converted to the
/// requested type, which also admits decimals and nullable integers.
/// Without one, the Arrow type must map directly and integer or boolean
/// arrays may not contain nulls.
pub fn array_to_column(name: &str, array: &ArrayRef, ty: Option<ElementType>) -> Result<Column> {
    if let Some(ty) = ty {
        return Ok(Column::from_values_typed(array_scalars(array)?, ty)?);
    }

    let dt = array.data_type();
    let ty = element_type_of(dt).ok_or_else(|| Error::Schema(format!("unknown type: {dt}")))?;
    if (ty.is_integer() || ty == ElementType::Bool) && array.null_count() > 0 {
        return Err(Error::Schema(format!(
            "nulls not supported for {dt} column: {name}"
        )));
    }

    let column = match dt {
        ArrowDataType::Boolean => {
            let arr = downcast::<BooleanArray>(array)?;
            Column::from((0..arr.len()).map(|i| arr.value(i)).collect::<Vec<bool>>())
        }
        ArrowDataType::Int8 => Column::from(primitive::<Int8Type>(array)?),
        ArrowDataType::Int16 => Column::from(primitive::<Int16Type>(array)?),
        ArrowDataType::Int32 => Column::from(primitive::<Int32Type>(array)?),
        ArrowDataType::Int64 => Column::from(primitive::<Int64Type>(array)?),
        ArrowDataType::UInt8 => Column::from(primitive::<UInt8Type>(array)?),
        ArrowDataType::UInt16 => Column::from(primitive::<UInt16Type>(array)?),
        ArrowDataType::UInt32 => Column::from(primitive::<UInt32Type>(array)?),
        ArrowDataType::UInt64 => Column::from(primitive::<UInt64Type>(array)?),
        // Float nulls become the NaN sentinel.
        ArrowDataType::Float32 => {
            let arr = downcast::<Float32Array>(array)?;
            Column::from(arr.iter().map(|v| v.unwrap_or(f32::NAN)).collect::<Vec<f32>>())
        }
        ArrowDataType::Float64 => {
            let arr = downcast::<Float64Array>(array)?;
            Column::from(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect::<Vec<f64>>())
        }
        _ => Column::from_values_typed(array_scalars(array)?, ElementType::Object)?,
    };
    Ok(column)
}

/// Every value of an array as a `Scalar`, nulls included.
fn array_scalars(array: &ArrayRef) -> Result<Vec<Scalar>> {
    macro_rules! collect {
        ($arr:ty, |$v:ident| $conv:expr) => {{
            let arr = downcast::<$arr>(array)?;
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        Scalar::Null
                    } else {
                        let $v = arr.value(i);
                        $conv
                    }
                })
                .collect()
        }};
    }

    let values: Vec<Scalar> = match array.data_type() {
        ArrowDataType::Boolean => collect!(BooleanArray, |v| Scalar::Bool(v)),
        ArrowDataType::Int8 => collect!(Int8Array, |v| Scalar::Int(v.into())),
        ArrowDataType::Int16 => collect!(Int16Array, |v| Scalar::Int(v.into())),
        ArrowDataType::Int32 => collect!(Int32Array, |v| Scalar::Int(v.into())),
        ArrowDataType::Int64 => collect!(Int64Array, |v| Scalar::Int(v)),
        ArrowDataType::UInt8 => collect!(UInt8Array, |v| Scalar::Int(v.into())),
        ArrowDataType::UInt16 => collect!(UInt16Array, |v| Scalar::Int(v.into())),
        ArrowDataType::UInt32 => collect!(UInt32Array, |v| Scalar::Int(v.into())),
        ArrowDataType::UInt64 => collect!(UInt64Array, |v| Scalar::UInt(v)),
        ArrowDataType::Float32 => collect!(Float32Array, |v| Scalar::Float(v.into())),
        ArrowDataType::Float64 => collect!(Float64Array, |v| Scalar::Float(v)),
        ArrowDataType::Utf8 => collect!(StringArray, |v| Scalar::Str(v.to_string())),
        ArrowDataType::LargeUtf8 => collect!(LargeStringArray, |v| Scalar::Str(v.to_string())),
        ArrowDataType::Decimal128(_, scale) => {
            let divisor = 10f64.powi(i32::from(*scale));
            collect!(Decimal128Array, |v| Scalar::Float(v as f64 / divisor))
        }
        dt => return Err(Error::Schema(format!("unknown type: {dt}"))),
    };
    Ok(values)
}

/// Convert one column to an Arrow array.
///
/// `Object` columns are written as UTF-8 and must hold only strings and nulls.
pub fn column_to_array(name: &str, column: &Column) -> Result<ArrayRef> {
    let array: ArrayRef = match column.data() {
        ColumnData::Bool(v) => Arc::new(BooleanArray::from(v.clone())),
        ColumnData::Int8(v) => Arc::new(Int8Array::from(v.clone())),
        ColumnData::Int16(v) => Arc::new(Int16Array::from(v.clone())),
        ColumnData::Int32(v) => Arc::new(Int32Array::from(v.clone())),
        ColumnData::Int64(v) => Arc::new(Int64Array::from(v.clone())),
        ColumnData::UInt8(v) => Arc::new(UInt8Array::from(v.clone())),
        ColumnData::UInt16(v) => Arc::new(UInt16Array::from(v.clone())),
        ColumnData::UInt32(v) => Arc::new(UInt32Array::from(v.clone())),
        ColumnData::UInt64(v) => Arc::new(UInt64Array::from(v.clone())),
        ColumnData::Float32(v) => Arc::new(Float32Array::from(v.clone())),
        ColumnData::Float64(v) => Arc::new(Float64Array::from(v.clone())),
        ColumnData::Object(values) => {
            let strings = values
                .iter()
                .map(|v| match v {
                    Scalar::Null => Ok(None),
                    Scalar::Str(s) => Ok(Some(s.as_str())),
                    other => Err(Error::Schema(format!(
                        "cannot write object column {name}: found {}",
                        other.type_name()
                    ))),
                })
                .collect::<Result<Vec<Option<&str>>>>()?;
            Arc::new(StringArray::from(strings))
        }
    };
    Ok(array)
}

/// Convert a whole table to a single record batch.
pub fn table_to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.shape().1);
    let mut arrays = Vec::with_capacity(table.shape().1);
    for (name, column) in table.columns() {
        let array = column_to_array(name, column)?;
        fields.push(Field::new(name, array.data_type().clone(), array.null_count() > 0));
        arrays.push(array);
    }
    let options = RecordBatchOptions::new().with_row_count(Some(table.size()));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(ArrowSchema::new(fields)),
        arrays,
        &options,
    )?)
}
