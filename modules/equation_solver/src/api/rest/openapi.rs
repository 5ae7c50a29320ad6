//! OpenAPI document for the Equation Solver REST surface.
//!
//! Built with the `utoipa` builders: every DTO is collected into `components`
//! and referenced from the operations by name.

use utoipa::openapi::{
    content::ContentBuilder,
    info::InfoBuilder,
    path::{
        HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder,
        PathsBuilder,
    },
    response::{Response, ResponseBuilder, ResponsesBuilder},
    schema::{ComponentsBuilder, ObjectBuilder, Schema, SchemaType, Type},
    OpenApi, OpenApiBuilder, Ref, RefOr, Required,
};
use utoipa::{PartialSchema, ToSchema};

use super::dto::{ErrorResponse, MessageResponse, SolveResponse};

const TAG: &str = "Equations";

type SchemaCollection = Vec<(String, RefOr<Schema>)>;

/// Adds `T` and the schemas it references to `collected`, returning its component name.
fn ensure_schema<T: ToSchema + PartialSchema>(collected: &mut SchemaCollection) -> String {
    let name = T::name().into_owned();
    if !collected.iter().any(|(existing, _)| *existing == name) {
        collected.push((name.clone(), <T as PartialSchema>::schema()));
        T::schemas(collected);
    }
    name
}

fn json_response(description: &str, schema_name: &str) -> Response {
    let content = ContentBuilder::new()
        .schema(Some(RefOr::Ref(Ref::from_schema_name(schema_name))))
        .build();
    ResponseBuilder::new()
        .description(description)
        .content("application/json", content)
        .build()
}

/// Builds the document served at `/openapi.json`.
#[must_use]
pub fn build_openapi() -> OpenApi {
    let mut collected = SchemaCollection::new();
    let message = ensure_schema::<MessageResponse>(&mut collected);
    let solved = ensure_schema::<SolveResponse>(&mut collected);
    let error = ensure_schema::<ErrorResponse>(&mut collected);

    let index = OperationBuilder::new()
        .operation_id(Some("equation_solver.index"))
        .summary(Some("Usage hint"))
        .tag(TAG)
        .responses(
            ResponsesBuilder::new()
                .response("200", json_response("Usage hint", &message))
                .build(),
        )
        .build();

    let equation_param = ParameterBuilder::new()
        .name("equation")
        .parameter_in(ParameterIn::Query)
        .required(Required::True)
        .description(Some(
            "Equation text such as `x^2 - 4 = 0`; without `=` it is equated to zero",
        ))
        .schema(Some(Schema::Object(
            ObjectBuilder::new()
                .schema_type(SchemaType::Type(Type::String))
                .build(),
        )))
        .build();

    let solve = OperationBuilder::new()
        .operation_id(Some("equation_solver.solve"))
        .summary(Some("Solve an equation"))
        .description(Some(
            "Normalizes the equation to `<expression> = 0` and solves it for every free variable",
        ))
        .tag(TAG)
        .parameter(equation_param)
        .responses(
            ResponsesBuilder::new()
                .response("200", json_response("Normalized equation and roots", &solved))
                .response("400", json_response("Missing or malformed equation", &error))
                .response("500", json_response("Equation could not be solved", &error))
                .build(),
        )
        .build();

    let paths = PathsBuilder::new()
        .path("/", PathItemBuilder::new().operation(HttpMethod::Get, index).build())
        .path("/solve", PathItemBuilder::new().operation(HttpMethod::Get, solve).build());

    let mut components = ComponentsBuilder::new();
    for (name, schema) in collected {
        components = components.schema(name, schema);
    }

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Equation API")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some("Normalizes and solves algebraic equations"))
                .build(),
        )
        .paths(paths.build())
        .components(Some(components.build()))
        .build()
}
