//! Integration tests for the DiagramBuilder API

use ucd::{
    DiagramBuilder, ErrorCode, Stage, UcdError,
    ast::Definition,
    config::{AppConfig, OutputConfig, OutputFormat},
};

const SHOP: &str = r#"@startuml Shop
actor :Customer: as customer <<human>>
actor Clerk
package Checkout {
    (Pay) as pay
    usecase "Print receipt" as receipt
    customer --> pay
    pay ..> receipt : includes
}
Clerk --> receipt
:Customer: <|-- Clerk
@enduml
"#;

#[test]
fn test_parse_simple_diagram() {
    let builder = DiagramBuilder::default();
    let result = builder.parse("@startuml\n:User:\n@enduml\n");
    assert!(
        result.is_ok(),
        "Should parse valid diagram: {:?}",
        result.err()
    );
}

#[test]
fn test_parse_nested_diagram() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(SHOP).expect("Failed to parse diagram");

    assert_eq!(diagram.name(), Some("Shop"));
    assert_eq!(diagram.entities().count(), 4);
    assert!(matches!(diagram.definitions()[2], Definition::Package(_)));
}

#[test]
fn test_render_text_round_trips() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(SHOP).expect("Failed to parse diagram");

    let text = builder.render(&diagram).expect("Failed to render diagram");
    assert!(text.contains("package Checkout {\n    (Pay) as pay\n"));

    let reparsed = builder.parse(&text).expect("Rendered text should parse");
    assert_eq!(reparsed, diagram);
}

#[test]
fn test_render_json() {
    let config = AppConfig::new(OutputConfig::new(OutputFormat::Json, 4));
    let builder = DiagramBuilder::new(config);
    let diagram = builder.parse(SHOP).expect("Failed to parse diagram");

    let json = builder.render(&diagram).expect("Failed to render diagram");
    assert!(json.contains("\"name\": \"Shop\""));
    assert!(json.contains("\"stereotype\": \"human\""));
    assert!(json.contains("\"label\": \"includes\""));
}

#[test]
fn test_semantic_error() {
    let builder = DiagramBuilder::default();
    let err = builder
        .parse("@startuml\n:User: --> (Login)\nusecase (Login)\n@enduml")
        .unwrap_err();

    let UcdError::Parse { err, .. } = err else {
        panic!("Expected parse error");
    };
    assert_eq!(err.code(), ErrorCode::E203);
    assert_eq!(err.stage(), Stage::Semantic);
    assert_eq!(err.location().line(), 2);
}

#[test]
fn test_builders_do_not_share_state() {
    let builder = DiagramBuilder::default();
    let source = "@startuml\nactor :User: as u\n@enduml\n";

    assert!(builder.parse(source).is_ok());
    assert!(builder.parse(source).is_ok());
    assert!(DiagramBuilder::default().parse(source).is_ok());
}
