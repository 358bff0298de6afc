//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: request and response bodies plus the domain error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that document domain types
//!   without coupling them to utoipa
//! - **Security**: the `profile_id` header naming the acting profile
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::admin::{BestClientBody, BestProfessionBody};
use crate::inbound::http::balances::{DepositBody, DepositRequestBody};
use crate::inbound::http::contracts::ContractBody;
use crate::inbound::http::jobs::{JobBody, PaymentBody};
use crate::inbound::http::profiles::ProfileBody;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the caller header security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ProfileId",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "profile_id",
                "Identifier of the acting profile.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace API",
        description = "Contracts, jobs and balance transfers between clients and contractors."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("ProfileId" = [])),
    paths(
        crate::inbound::http::contracts::get_contract,
        crate::inbound::http::contracts::list_contracts,
        crate::inbound::http::contracts::list_all_contracts,
        crate::inbound::http::jobs::list_unpaid_jobs,
        crate::inbound::http::jobs::pay_for_job,
        crate::inbound::http::jobs::list_all_jobs,
        crate::inbound::http::balances::deposit,
        crate::inbound::http::admin::best_profession,
        crate::inbound::http::admin::best_clients,
        crate::inbound::http::profiles::list_profiles,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ContractBody,
        JobBody,
        PaymentBody,
        DepositRequestBody,
        DepositBody,
        BestProfessionBody,
        BestClientBody,
        ProfileBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "contracts", description = "Contracts visible to the caller"),
        (name = "jobs", description = "Jobs visible to the caller"),
        (name = "payments", description = "Job payments and balance deposits"),
        (name = "admin", description = "Earnings and spending reports"),
        (name = "listings", description = "Unrestricted listings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, "code")]
    #[case(ERROR_SCHEMA_NAME, "traceId")]
    #[case("JobBody", "paymentDate")]
    #[case("PaymentBody", "payeeId")]
    #[case("DepositBody", "balance")]
    #[case("BestClientBody", "fullName")]
    #[case("ProfileBody", "type")]
    fn schemas_expose_serialised_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas
            .get(schema)
            .unwrap_or_else(|| panic!("{schema} schema registered"));
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/contracts/{id}")]
    #[case("/jobs/{job_id}/pay")]
    #[case("/balances/deposit/{userId}")]
    #[case("/admin/best-clients")]
    #[case("/allContracts")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "{path} documented");
    }

    #[rstest]
    fn caller_header_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key("ProfileId"));
    }
}
