//! Wire-level request bodies and their validation.
//!
//! Bodies must be JSON objects. Fields are deserialized leniently (every
//! field optional) so that a missing field is reported by name, in a fixed
//! order, instead of as a generic parse failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::ValidationError;

use super::types::{NewVehicle, VehicleUpdate};

/// `POST /add_vehicle` body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateVehicleRequest {
    /// Manufacturer. Required.
    pub make: Option<String>,
    /// Model name. Required.
    pub model: Option<String>,
    /// Model year. Required.
    pub year: Option<i64>,
    /// Odometer reading. Required.
    pub mileage: Option<i64>,
    /// Diagnostic trouble code.
    pub error_code: Option<String>,
}

impl TryFrom<CreateVehicleRequest> for NewVehicle {
    type Error = ValidationError;

    fn try_from(request: CreateVehicleRequest) -> Result<Self, Self::Error> {
        let make = request.make.ok_or(ValidationError::MissingField("make"))?;
        let model = request.model.ok_or(ValidationError::MissingField("model"))?;
        let year = request.year.ok_or(ValidationError::MissingField("year"))?;
        let mileage = request
            .mileage
            .ok_or(ValidationError::MissingField("mileage"))?;

        Ok(NewVehicle {
            make: non_empty("make", make)?,
            model: non_empty("model", model)?,
            year,
            mileage,
            error_code: request.error_code,
        })
    }
}

/// `PUT /vehicles/{id}` body.
///
/// `null` on a non-nullable column is treated like an absent key.
/// `null` on `error_code` clears the stored code.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateVehicleRequest {
    /// New manufacturer.
    pub make: Option<String>,
    /// New model name.
    pub model: Option<String>,
    /// New model year.
    pub year: Option<i64>,
    /// New odometer reading.
    pub mileage: Option<i64>,
    /// New diagnostic trouble code; `null` clears it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub error_code: Option<Option<String>>,
}

impl TryFrom<UpdateVehicleRequest> for VehicleUpdate {
    type Error = ValidationError;

    fn try_from(request: UpdateVehicleRequest) -> Result<Self, Self::Error> {
        Ok(VehicleUpdate {
            make: request.make.map(|v| non_empty("make", v)).transpose()?,
            model: request.model.map(|v| non_empty("model", v)).transpose()?,
            year: request.year,
            mileage: request.mileage,
            error_code: request.error_code,
        })
    }
}

/// Decode a request body that must be a JSON object.
///
/// A blank body, a literal `null`, or `{}` carries no input and yields
/// `None`. Arrays and scalars are rejected rather than mapped onto fields
/// by position.
pub fn decode_object<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

    match value {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        Value::Object(map) => serde_json::from_value(Value::Object(map))
            .map(Some)
            .map_err(|e| ValidationError::InvalidJson(e.to_string())),
        Value::Array(_) => Err(ValidationError::NotAnObject("array")),
        Value::Bool(_) => Err(ValidationError::NotAnObject("boolean")),
        Value::Number(_) => Err(ValidationError::NotAnObject("number")),
        Value::String(_) => Err(ValidationError::NotAnObject("string")),
    }
}

/// Marks a key as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_create(json: &str) -> Result<NewVehicle, ValidationError> {
        decode_object::<CreateVehicleRequest>(json.as_bytes())?
            .ok_or(ValidationError::NoInput)?
            .try_into()
    }

    fn parse_update(json: &str) -> Result<VehicleUpdate, ValidationError> {
        decode_object::<UpdateVehicleRequest>(json.as_bytes())?
            .unwrap_or_default()
            .try_into()
    }

    #[test]
    fn complete_create_body_is_accepted() {
        let vehicle = parse_create(
            r#"{"make":"Toyota","model":"Corolla","year":2019,"mileage":30000,"error_code":"P0420"}"#,
        )
        .unwrap();

        assert_eq!(
            vehicle,
            NewVehicle::new("Toyota", "Corolla", 2019, 30000).with_error_code("P0420")
        );
    }

    #[test]
    fn error_code_is_optional_on_create() {
        let vehicle =
            parse_create(r#"{"make":"Ford","model":"F150","year":2020,"mileage":1000}"#).unwrap();
        assert_eq!(vehicle.error_code, None);
    }

    #[test]
    fn blank_null_and_empty_object_carry_no_input() {
        for body in ["", "  \n", "null", "{}"] {
            assert_eq!(parse_create(body), Err(ValidationError::NoInput), "body {body:?}");
        }
    }

    #[test]
    fn unknown_or_null_keys_report_first_missing_field() {
        assert_eq!(
            parse_create(r#"{"foo":1}"#),
            Err(ValidationError::MissingField("make"))
        );
        assert_eq!(
            parse_create(r#"{"make":null,"model":null,"year":null,"mileage":null}"#),
            Err(ValidationError::MissingField("make"))
        );
    }

    #[test]
    fn positional_bodies_are_rejected() {
        assert_eq!(
            parse_create(r#"["Ford","F150",2020,1000,null]"#),
            Err(ValidationError::NotAnObject("array"))
        );
        assert_eq!(
            parse_update(r#"["Ford"]"#),
            Err(ValidationError::NotAnObject("array"))
        );
        assert_eq!(parse_create("42"), Err(ValidationError::NotAnObject("number")));
    }

    #[test]
    fn malformed_or_mistyped_json_is_invalid() {
        assert!(matches!(
            parse_create("{make:"),
            Err(ValidationError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_create(r#"{"year":"soon"}"#),
            Err(ValidationError::InvalidJson(_))
        ));
    }

    #[test]
    fn first_missing_field_is_reported() {
        assert_eq!(
            parse_create(r#"{"year":2020}"#),
            Err(ValidationError::MissingField("make"))
        );
        assert_eq!(
            parse_create(r#"{"make":"Ford","model":"F150","year":2020}"#),
            Err(ValidationError::MissingField("mileage"))
        );
        assert_eq!(
            parse_create(r#"{"make":"Ford","mileage":5}"#),
            Err(ValidationError::MissingField("model"))
        );
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            parse_create(r#"{"make":"  ","model":"F150","year":2020,"mileage":1}"#),
            Err(ValidationError::EmptyField("make"))
        );
        assert_eq!(
            parse_update(r#"{"model":""}"#),
            Err(ValidationError::EmptyField("model"))
        );
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let absent = parse_update(r#"{"mileage":2000}"#).unwrap();
        assert_eq!(absent.mileage, Some(2000));
        assert_eq!(absent.error_code, None);

        let cleared = parse_update(r#"{"error_code":null}"#).unwrap();
        assert_eq!(cleared.error_code, Some(None));

        let set = parse_update(r#"{"error_code":"P0171"}"#).unwrap();
        assert_eq!(set.error_code, Some(Some("P0171".to_string())));
    }

    #[test]
    fn null_on_required_column_is_ignored() {
        let update = parse_update(r#"{"make":null,"year":null}"#).unwrap();
        assert!(update.is_empty());
    }
}
