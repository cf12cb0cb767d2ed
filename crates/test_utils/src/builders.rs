//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::RegistrationId;
use domain_registration::{DraftPatch, DraftRegistration, Registration};
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::job::en::Title;
use fake::faker::name::en::Name;
use fake::Fake;

use crate::fixtures::StringFixtures;

/// Builder for constructing draft registrations
///
/// Defaults produce a draft that passes full validation, so tests only
/// override the fields they are exercising. Values are raw text the way the
/// wizard receives them, masks included.
pub struct DraftBuilder {
    consent: bool,
    full_name: String,
    cpf: String,
    rg: String,
    birth_date: String,
    street: String,
    neighborhood: String,
    city: String,
    address_note: Option<String>,
    whatsapp: String,
    email: String,
    profession: String,
    company: Option<String>,
    work_address: String,
    work_phone: String,
    spouse: Option<(String, String)>,
    dependents: Vec<(String, String)>,
}

impl Default for DraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            consent: true,
            full_name: StringFixtures::full_name().to_string(),
            cpf: StringFixtures::cpf_masked().to_string(),
            rg: "12.345.678-9".to_string(),
            birth_date: "1980-03-15".to_string(),
            street: "Rua das Flores, 123".to_string(),
            neighborhood: "Centro".to_string(),
            city: "Curitiba".to_string(),
            address_note: None,
            whatsapp: StringFixtures::mobile_phone_masked().to_string(),
            email: StringFixtures::email().to_string(),
            profession: "Engenheira Civil".to_string(),
            company: None,
            work_address: "Av. Sete de Setembro, 1000".to_string(),
            work_phone: StringFixtures::landline_masked().to_string(),
            spouse: None,
            dependents: Vec::new(),
        }
    }

    /// Creates a builder seeded with randomized but valid values
    ///
    /// Useful for tests that need many distinct members without caring about
    /// the exact identity, such as uniqueness checks over a batch of inserts.
    /// Every generated draft still passes full validation.
    pub fn randomized() -> Self {
        let year: i32 = (1940..2005).fake();
        let month: u32 = (1..13).fake();
        let day: u32 = (1..29).fake();

        Self {
            consent: true,
            full_name: Name().fake(),
            cpf: format!("{:011}", (0..100_000_000_000u64).fake::<u64>()),
            rg: format!(
                "{}.{:03}.{:03}-{}",
                (1..10).fake::<u32>(),
                (0..1000).fake::<u32>(),
                (0..1000).fake::<u32>(),
                (0..10).fake::<u32>()
            ),
            birth_date: format!("{:04}-{:02}-{:02}", year, month, day),
            street: format!("{}, {}", StreetName().fake::<String>(), (1..2000).fake::<u32>()),
            neighborhood: CityName().fake(),
            city: CityName().fake(),
            address_note: None,
            whatsapp: format!("419{:08}", (0..100_000_000u64).fake::<u64>()),
            email: SafeEmail().fake(),
            profession: Title().fake(),
            company: Some(CompanyName().fake()),
            work_address: format!(
                "{}, {}",
                StreetName().fake::<String>(),
                (1..2000).fake::<u32>()
            ),
            work_phone: format!("41{:08}", (0..100_000_000u64).fake::<u64>()),
            spouse: None,
            dependents: Vec::new(),
        }
    }

    /// Sets the consent flag
    pub fn with_consent(mut self, consent: bool) -> Self {
        self.consent = consent;
        self
    }

    /// Sets the full name
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Sets the CPF (raw text, mask optional)
    pub fn with_cpf(mut self, cpf: impl Into<String>) -> Self {
        self.cpf = cpf.into();
        self
    }

    /// Sets the RG
    pub fn with_rg(mut self, rg: impl Into<String>) -> Self {
        self.rg = rg.into();
        self
    }

    /// Sets the birth date as `YYYY-MM-DD` text
    pub fn with_birth_date(mut self, birth_date: impl Into<String>) -> Self {
        self.birth_date = birth_date.into();
        self
    }

    /// Sets the street line
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = street.into();
        self
    }

    /// Sets the neighborhood
    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = neighborhood.into();
        self
    }

    /// Sets the city
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Sets the optional address note
    pub fn with_address_note(mut self, note: impl Into<String>) -> Self {
        self.address_note = Some(note.into());
        self
    }

    /// Sets the WhatsApp number (raw text, mask optional)
    pub fn with_whatsapp(mut self, whatsapp: impl Into<String>) -> Self {
        self.whatsapp = whatsapp.into();
        self
    }

    /// Sets the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the profession
    pub fn with_profession(mut self, profession: impl Into<String>) -> Self {
        self.profession = profession.into();
        self
    }

    /// Sets the optional employer name
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Sets the work address
    pub fn with_work_address(mut self, work_address: impl Into<String>) -> Self {
        self.work_address = work_address.into();
        self
    }

    /// Sets the work phone (raw text, mask optional)
    pub fn with_work_phone(mut self, work_phone: impl Into<String>) -> Self {
        self.work_phone = work_phone.into();
        self
    }

    /// Sets the complete spouse pair
    pub fn with_spouse(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.spouse = Some((name.into(), email.into()));
        self
    }

    /// Adds a dependent entry as raw `name` / `YYYY-MM-DD` text
    pub fn with_dependent(
        mut self,
        name: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        self.dependents.push((name.into(), birth_date.into()));
        self
    }

    /// Builds the draft registration
    ///
    /// Dependent entries go through the guarded add operation, so an entry
    /// the domain would reject makes this panic; exercise the add-time guard
    /// directly instead of through the builder.
    pub fn build(self) -> DraftRegistration {
        let (spouse_name, spouse_email) = match self.spouse {
            Some((name, email)) => (Some(name), Some(email)),
            None => (None, None),
        };

        let mut draft = DraftRegistration::new();
        draft.apply(DraftPatch {
            consent: Some(self.consent),
            full_name: Some(self.full_name),
            cpf: Some(self.cpf),
            rg: Some(self.rg),
            birth_date: Some(self.birth_date),
            street: Some(self.street),
            neighborhood: Some(self.neighborhood),
            city: Some(self.city),
            address_note: self.address_note,
            whatsapp: Some(self.whatsapp),
            email: Some(self.email),
            profession: Some(self.profession),
            company: self.company,
            work_address: Some(self.work_address),
            work_phone: Some(self.work_phone),
            spouse_name,
            spouse_email,
        });

        for (name, birth_date) in &self.dependents {
            draft
                .add_dependent(name, birth_date)
                .expect("builder dependent entry is valid");
        }

        draft
    }

    /// Builds a persisted registration from the draft under the given id
    ///
    /// Panics if the draft fails validation; use [`DraftBuilder::build`] and
    /// the domain APIs when the failure path is the thing under test.
    pub fn build_registration(self, id: RegistrationId) -> Registration {
        let draft = self.build();
        Registration::from_draft(id, &draft).expect("builder draft is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_registration::FieldValidator;

    use crate::fixtures::IdFixtures;

    #[test]
    fn test_default_builder_produces_valid_draft() {
        let draft = DraftBuilder::new().build();
        let report = FieldValidator::validate_draft(&draft);
        assert!(report.is_valid, "errors: {:?}", report.errors);
    }

    #[test]
    fn test_randomized_builder_produces_valid_draft() {
        for _ in 0..16 {
            let draft = DraftBuilder::randomized().build();
            let report = FieldValidator::validate_draft(&draft);
            assert!(report.is_valid, "errors: {:?}", report.errors);
        }
    }

    #[test]
    fn test_builder_overrides_only_named_fields() {
        let draft = DraftBuilder::new()
            .with_full_name("Carlos Lima")
            .with_cpf("111.444.777-35")
            .build();

        assert_eq!(draft.personal.full_name, "Carlos Lima");
        assert_eq!(draft.personal.cpf, "111.444.777-35");
        // defaults untouched
        assert_eq!(draft.personal.city, "Curitiba");
    }

    #[test]
    fn test_builder_spouse_and_dependents() {
        let draft = DraftBuilder::new()
            .with_spouse("Clara Lima", "clara@example.com")
            .with_dependent("Ana Lima", "2012-07-01")
            .build();

        assert!(draft.has_spouse());
        assert_eq!(draft.dependents().len(), 1);
        assert_eq!(draft.dependents()[0].name, "Ana Lima");
    }

    #[test]
    fn test_build_registration_normalizes() {
        let registration = DraftBuilder::new()
            .with_cpf("529.982.247-25")
            .build_registration(IdFixtures::registration_id());

        assert_eq!(registration.cpf, "52998224725");
        assert_eq!(registration.id, IdFixtures::registration_id());
    }
}
