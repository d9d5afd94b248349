//! Schema validation for the create-restaurant form.
//!
//! | Field | Rule |
//! |---|---|
//! | name | required, at most 100 characters |
//! | category | required, at most 50 characters |
//! | rating | required number in `[1, 5]` |
//! | description | optional, at most 500 characters |
//!
//! Lengths count Unicode scalar values.

use restaurant_map_restaurant_models::{Coordinate, CreateRestaurant};
use strum_macros::{AsRefStr, Display, EnumString};

/// Maximum length of a restaurant name.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum length of a category label.
pub const CATEGORY_MAX_CHARS: usize = 50;
/// Maximum length of a description.
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Lowest accepted rating.
pub const RATING_MIN: f64 = 1.0;
/// Highest accepted rating.
pub const RATING_MAX: f64 = 5.0;

/// A user-editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FormField {
    /// Restaurant name.
    Name,
    /// Category label.
    Category,
    /// Rating (1-5).
    Rating,
    /// Optional description.
    Description,
}

impl FormField {
    /// All fields, in display order.
    pub const ALL: &[Self] = &[Self::Name, Self::Category, Self::Rating, Self::Description];

    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Restaurant Name",
            Self::Category => "Category",
            Self::Rating => "Rating (1-5)",
            Self::Description => "Description (Optional)",
        }
    }
}

/// A validation failure on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The failing field.
    pub field: FormField,
    /// Message shown under the field.
    pub message: &'static str,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw form input, exactly as typed.
///
/// The rating is kept as text so that a half-typed or non-numeric value
/// can be reported instead of silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantForm {
    /// Restaurant name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Rating as typed.
    pub rating: String,
    /// Description, empty when not provided.
    pub description: String,
}

impl RestaurantForm {
    /// Returns the raw value of `field`.
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Category => &self.category,
            FormField::Rating => &self.rating,
            FormField::Description => &self.description,
        }
    }

    /// Replaces the raw value of `field`.
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Category => self.category = value,
            FormField::Rating => self.rating = value,
            FormField::Description => self.description = value,
        }
    }
}

/// Form values that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRestaurant {
    /// Restaurant name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Rating in `[1, 5]`.
    pub rating: f64,
    /// Description, if one was entered.
    pub description: Option<String>,
}

impl ValidRestaurant {
    /// Builds the create payload, taking the coordinates from the map
    /// position the form was opened for.
    #[must_use]
    pub fn into_payload(self, position: Coordinate) -> CreateRestaurant {
        CreateRestaurant {
            name: self.name,
            latitude: position.latitude,
            longitude: position.longitude,
            category: self.category,
            rating: self.rating,
            description: self.description.unwrap_or_default(),
        }
    }
}

/// Validates a single field.
#[must_use]
pub fn validate_field(form: &RestaurantForm, field: FormField) -> Option<FieldError> {
    let message = match field {
        FormField::Name => check_text(
            &form.name,
            NAME_MAX_CHARS,
            "Restaurant name is required",
            "Restaurant name must be 100 characters or less",
        ),
        FormField::Category => check_text(
            &form.category,
            CATEGORY_MAX_CHARS,
            "Category type is required",
            "Category must be 50 characters or less",
        ),
        FormField::Rating => parse_rating(&form.rating).err(),
        FormField::Description => (form.description.chars().count() > DESCRIPTION_MAX_CHARS)
            .then_some("Description must be 500 characters or less"),
    }?;

    Some(FieldError { field, message })
}

/// Validates the whole form.
///
/// # Errors
///
/// Returns every failing field, in [`FormField::ALL`] order.
pub fn validate(form: &RestaurantForm) -> Result<ValidRestaurant, Vec<FieldError>> {
    let errors: Vec<FieldError> = FormField::ALL
        .iter()
        .filter_map(|field| validate_field(form, *field))
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    let rating = parse_rating(&form.rating).map_err(|message| {
        vec![FieldError {
            field: FormField::Rating,
            message,
        }]
    })?;

    Ok(ValidRestaurant {
        name: form.name.clone(),
        category: form.category.clone(),
        rating,
        description: Some(form.description.clone()).filter(|d| !d.is_empty()),
    })
}

fn check_text(
    value: &str,
    max_chars: usize,
    required: &'static str,
    too_long: &'static str,
) -> Option<&'static str> {
    if value.is_empty() {
        Some(required)
    } else if value.chars().count() > max_chars {
        Some(too_long)
    } else {
        None
    }
}

fn parse_rating(raw: &str) -> Result<f64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Rating is required");
    }
    let rating: f64 = raw
        .parse()
        .ok()
        .filter(|r: &f64| r.is_finite())
        .ok_or("Rating must be a number")?;
    if rating < RATING_MIN {
        return Err("Rating must be at least 1");
    }
    if rating > RATING_MAX {
        return Err("Rating must be at most 5");
    }
    Ok(rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, category: &str, rating: &str, description: &str) -> RestaurantForm {
        RestaurantForm {
            name: name.to_string(),
            category: category.to_string(),
            rating: rating.to_string(),
            description: description.to_string(),
        }
    }

    fn messages(errors: &[FieldError]) -> Vec<(FormField, &'static str)> {
        errors.iter().map(|e| (e.field, e.message)).collect()
    }

    #[test]
    fn accepts_valid_form() {
        let valid = validate(&form("New Spot", "american", "5", "")).unwrap();
        assert_eq!(valid.name, "New Spot");
        assert!((valid.rating - 5.0).abs() < f64::EPSILON);
        assert_eq!(valid.description, None);
    }

    #[test]
    fn accepts_fractional_rating_and_description() {
        let valid = validate(&form("Pasta Place", "italian", "4.5", "Fresh pasta")).unwrap();
        assert!((valid.rating - 4.5).abs() < f64::EPSILON);
        assert_eq!(valid.description.as_deref(), Some("Fresh pasta"));
    }

    #[test]
    fn empty_form_reports_required_fields() {
        let errors = validate(&RestaurantForm::default()).unwrap_err();
        assert_eq!(
            messages(&errors),
            vec![
                (FormField::Name, "Restaurant name is required"),
                (FormField::Category, "Category type is required"),
                (FormField::Rating, "Rating is required"),
            ]
        );
    }

    #[test]
    fn enforces_length_limits() {
        let errors = validate(&form(
            &"n".repeat(101),
            &"c".repeat(51),
            "3",
            &"d".repeat(501),
        ))
        .unwrap_err();
        assert_eq!(
            messages(&errors),
            vec![
                (FormField::Name, "Restaurant name must be 100 characters or less"),
                (FormField::Category, "Category must be 50 characters or less"),
                (FormField::Description, "Description must be 500 characters or less"),
            ]
        );
    }

    #[test]
    fn limits_are_inclusive() {
        assert!(validate(&form(&"n".repeat(100), &"c".repeat(50), "1", &"d".repeat(500))).is_ok());
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(validate(&form(&"é".repeat(100), "french", "4", "")).is_ok());
    }

    #[test]
    fn rating_bounds() {
        let check = |raw: &str| validate_field(&form("a", "b", raw, ""), FormField::Rating);
        assert_eq!(check("0.5").unwrap().message, "Rating must be at least 1");
        assert_eq!(check("5.1").unwrap().message, "Rating must be at most 5");
        assert_eq!(check("great").unwrap().message, "Rating must be a number");
        assert_eq!(check("NaN").unwrap().message, "Rating must be a number");
        assert!(check("1").is_none());
        assert!(check("5").is_none());
    }

    #[test]
    fn payload_takes_coordinates_from_position() {
        let valid = validate(&form("New Spot", "american", "5", "")).unwrap();
        let payload = valid.into_payload(Coordinate::new(40.0, -73.9));
        assert!((payload.latitude - 40.0).abs() < f64::EPSILON);
        assert!((payload.longitude - -73.9).abs() < f64::EPSILON);
        assert_eq!(payload.description, "");
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("rating".parse::<FormField>().unwrap(), FormField::Rating);
        assert_eq!(FormField::Description.to_string(), "description");
    }
}
