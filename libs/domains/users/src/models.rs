use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Assigned by the repository, never zero
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub sex: String,
}

impl User {
    pub fn from_input(id: i64, input: UserInput) -> Self {
        Self {
            id,
            name: input.name,
            age: input.age,
            sex: input.sex,
        }
    }
}

/// Body of create and update requests.
///
/// Missing fields fall back to zero values. An `id` in the body must be an
/// integer and is then ignored. Updates replace every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(from = "UserInputBody")]
pub struct UserInput {
    #[validate(length(max = 255))]
    #[schema(example = "Ann", max_length = 255)]
    pub name: String,

    #[schema(example = 30)]
    pub age: i32,

    #[validate(length(max = 10))]
    #[schema(example = "F", max_length = 10)]
    pub sex: String,
}

/// Wire form of [`UserInput`]; `id` is type-checked and dropped.
#[derive(Deserialize, Default)]
#[serde(default)]
struct UserInputBody {
    #[allow(dead_code)]
    id: Option<i64>,
    name: String,
    age: i32,
    sex: String,
}

impl From<UserInputBody> for UserInput {
    fn from(body: UserInputBody) -> Self {
        Self {
            name: body.name,
            age: body.age,
            sex: body.sex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_defaults_missing_fields_and_ignores_id() {
        let input: UserInput = serde_json::from_str(r#"{"id": 99, "name": "Ann"}"#).unwrap();
        assert_eq!(
            input,
            UserInput {
                name: "Ann".to_string(),
                age: 0,
                sex: String::new(),
            }
        );
    }

    #[test]
    fn test_input_rejects_non_integer_id() {
        for body in [r#"{"id": "x", "name": "Ann"}"#, r#"{"id": 1.5}"#] {
            assert!(serde_json::from_str::<UserInput>(body).is_err(), "{}", body);
        }
        assert!(serde_json::from_str::<UserInput>(r#"{"id": null}"#).is_ok());
    }

    #[test]
    fn test_input_rejects_overlong_fields() {
        let input = UserInput {
            name: "x".repeat(256),
            age: 1,
            sex: "unspecified".to_string(),
        };

        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("sex"));
    }

    #[test]
    fn test_user_json_shape() {
        let user = User::from_input(
            7,
            UserInput {
                name: "Bob".to_string(),
                age: 41,
                sex: "M".to_string(),
            },
        );

        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            serde_json::json!({"id": 7, "name": "Bob", "age": 41, "sex": "M"})
        );
    }
}
