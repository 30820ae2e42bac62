//! Check-in flow (签到)
//!
//! Phone lookup, new-customer registration and visit recording. Form input
//! arrives as typed text and is validated before anything reaches the store.

use loyalty_client::LoyaltyGateway;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Customer, NewCustomer, Visit};
use shared::util::{new_id, non_empty, now};
use shared::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, parse_amount, validate_email, validate_optional_text,
    validate_phone, validate_required_text,
};
use uuid::Uuid;

use crate::core::{DeskError, DeskResult, LoyaltyState};
use crate::loyalty::points_for_amount;

/// Preset service with its default price in major units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetService {
    pub name: &'static str,
    pub default_amount: u32,
}

pub const PRESET_SERVICES: &[PresetService] = &[
    PresetService { name: "Haircut", default_amount: 35 },
    PresetService { name: "Haircut & Style", default_amount: 55 },
    PresetService { name: "Color", default_amount: 85 },
    PresetService { name: "Highlights", default_amount: 120 },
    PresetService { name: "Blowout", default_amount: 45 },
    PresetService { name: "Treatment", default_amount: 65 },
];

/// Outcome of the phone step
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Known customer; continue with the visit form
    Found(Customer),
    /// Unknown number; continue with registration
    NotFound { phone: String },
}

/// Look up the customer checking in by phone
pub fn lookup<G: LoyaltyGateway>(state: &LoyaltyState<G>, phone: &str) -> AppResult<Lookup> {
    validate_phone(phone)?;
    Ok(match state.find_customer_by_phone(phone) {
        Some(customer) => {
            tracing::info!(customer_id = %customer.id, "Found {}", customer.full_name());
            Lookup::Found(customer.clone())
        }
        None => Lookup::NotFound {
            phone: phone.trim().to_string(),
        },
    })
}

/// New customer form
#[derive(Debug, Clone, Default)]
pub struct NewCustomerForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

impl NewCustomerForm {
    /// Validate and build the creation payload (joining now)
    pub fn validate(&self) -> AppResult<NewCustomer> {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if first.is_empty() || last.is_empty() {
            return Err(AppError::new(ErrorCode::CustomerNameRequired));
        }
        validate_required_text(first, "first_name", MAX_NAME_LEN)?;
        validate_required_text(last, "last_name", MAX_NAME_LEN)?;
        validate_phone(&self.phone)?;
        validate_email(&self.email)?;

        Ok(NewCustomer::joining_now(first, last, self.phone.trim(), self.email.trim()))
    }
}

/// Visit form
#[derive(Debug, Clone, Default)]
pub struct VisitForm {
    pub service: String,
    /// Major units as typed, e.g. "35.50"
    pub amount: String,
    pub notes: String,
    pub staff_member: String,
}

impl VisitForm {
    /// Form prefilled from a preset service
    pub fn from_preset(preset: &PresetService) -> Self {
        Self {
            service: preset.name.to_string(),
            amount: preset.default_amount.to_string(),
            ..Default::default()
        }
    }

    /// Points the visit would earn, 0 while the amount is not valid
    pub fn preview_points(&self) -> i64 {
        parse_amount(&self.amount).map(points_for_amount).unwrap_or(0)
    }

    /// Validate and build the visit, dated now
    pub fn into_visit(self, customer_id: Uuid) -> AppResult<Visit> {
        let service = self.service.trim();
        if service.is_empty() || self.amount.trim().is_empty() {
            return Err(AppError::new(ErrorCode::VisitServiceRequired));
        }
        validate_required_text(service, "service", MAX_NAME_LEN)?;
        let amount = parse_amount(&self.amount)?;

        let notes = non_empty(&self.notes);
        let staff_member = non_empty(&self.staff_member);
        validate_optional_text(&notes, "notes", MAX_NOTE_LEN)?;
        validate_optional_text(&staff_member, "staff_member", MAX_SHORT_TEXT_LEN)?;

        Ok(Visit {
            id: new_id(),
            customer_id,
            date: now(),
            service: service.to_string(),
            amount,
            points: points_for_amount(amount),
            notes,
            staff_member,
        })
    }
}

/// Register a new customer from the form
pub async fn register<G: LoyaltyGateway>(
    state: &mut LoyaltyState<G>,
    form: &NewCustomerForm,
) -> DeskResult<Customer> {
    let payload = form.validate()?;
    let customer = state.add_customer(payload).await?;
    tracing::info!(customer_id = %customer.id, "New customer created");
    Ok(customer)
}

/// Record a paid visit for a checked-in customer
pub async fn record_visit<G: LoyaltyGateway>(
    state: &mut LoyaltyState<G>,
    customer_id: Uuid,
    form: VisitForm,
) -> DeskResult<Visit> {
    if state.customer(customer_id).is_none() {
        return Err(DeskError::NotFound("Customer".into()));
    }
    let visit = form.into_visit(customer_id)?;
    let visit = state.add_visit(visit).await?;
    tracing::info!(visit_id = %visit.id, "Visit recorded! +{} points earned", visit.points);
    Ok(visit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit_form(service: &str, amount: &str) -> VisitForm {
        VisitForm {
            service: service.into(),
            amount: amount.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_customer_form() {
        let form = NewCustomerForm {
            first_name: " Jane ".into(),
            last_name: "Doe".into(),
            phone: "+254723456789".into(),
            email: String::new(),
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.first_name, "Jane");
        assert_eq!(payload.email, "");

        let missing = NewCustomerForm {
            last_name: String::new(),
            ..form.clone()
        };
        assert_eq!(missing.validate().unwrap_err().code, ErrorCode::CustomerNameRequired);

        let bad_email = NewCustomerForm {
            email: "jane@".into(),
            ..form
        };
        assert_eq!(bad_email.validate().unwrap_err().code, ErrorCode::CustomerEmailInvalid);
    }

    #[test]
    fn test_visit_form() {
        let customer_id = Uuid::new_v4();
        let mut form = visit_form("Haircut", "35.50");
        form.staff_member = "Maria".into();
        let visit = form.into_visit(customer_id).unwrap();

        assert_eq!(visit.amount, 3550);
        assert_eq!(visit.points, 35);
        assert_eq!(visit.staff_member.as_deref(), Some("Maria"));
        assert_eq!(visit.notes, None);
        assert_eq!(visit.customer_id, customer_id);
    }

    #[test]
    fn test_visit_form_rejects_bad_input() {
        let id = Uuid::new_v4();
        assert_eq!(
            visit_form("", "35").into_visit(id).unwrap_err().code,
            ErrorCode::VisitServiceRequired
        );
        assert_eq!(
            visit_form("Haircut", "").into_visit(id).unwrap_err().code,
            ErrorCode::VisitServiceRequired
        );
        assert_eq!(
            visit_form("Haircut", "-3").into_visit(id).unwrap_err().code,
            ErrorCode::VisitAmountInvalid
        );
    }

    #[test]
    fn test_presets_and_preview() {
        let form = VisitForm::from_preset(&PRESET_SERVICES[3]);
        assert_eq!(form.service, "Highlights");
        assert_eq!(form.preview_points(), 120);
        assert_eq!(visit_form("Haircut", "abc").preview_points(), 0);
    }
}
