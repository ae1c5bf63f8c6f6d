use hyperform_core::prelude::*;
use hyperform_core::{InputType, PageMetadata, ParamLocation, SELF_REL};
use pretty_assertions::assert_eq;
use serde_json::json;

fn event_type() -> BeanType {
    BeanType::new("Event")
        .property(
            PropertyDescriptor::new("performer", ValueType::String)
                .with_access(PropertyAccess::CreateOnly)
                .required(),
        )
        .property(PropertyDescriptor::new("eventStatus", ValueType::String).with_possible_values(
            PossibleValues::enumeration(["EVENT_CANCELLED", "EVENT_SCHEDULED"]),
        ))
        .property(PropertyDescriptor::new("doorsOpen", ValueType::DateTime))
}

fn event_handler() -> HandlerMethod {
    HandlerMethod::new("event", "/events/{eventId}")
        .method(HttpMethod::Get)
        .method(HttpMethod::Put)
        .method(HttpMethod::Delete)
        .param(MethodParameter::path_variable("eventId"))
        .param(MethodParameter::request_body("event", event_type()))
}

#[test]
fn test_assembled_link_carries_all_affordances() {
    let args = Arguments::new()
        .bind("eventId", 3)
        .bind("event", json!({"performer": "Cornelia Bielefeldt", "eventStatus": "EVENT_SCHEDULED"}));
    let affordances = AffordanceAssembler::new()
        .assemble(&event_handler(), &args)
        .unwrap();
    let link = Link::from_affordances(SELF_REL, affordances).unwrap();

    assert_eq!(link.href(), "/events/3");
    assert!(!link.is_templated());

    let put = &link.affordances()[1];
    assert_eq!(put.http_method(), HttpMethod::Put);
    let inputs: Vec<(&str, InputType)> = put
        .input_parameters()
        .iter()
        .map(|p| (p.name(), p.input_type()))
        .collect();
    assert_eq!(
        inputs,
        vec![("eventStatus", InputType::Text), ("doorsOpen", InputType::DatetimeLocal)]
    );
    assert_eq!(put.input_parameters()[0].value_formatted(), "EVENT_SCHEDULED");
    assert_eq!(
        put.request_body().map(ActionInputParameter::location),
        Some(ParamLocation::Body)
    );
}

#[test]
fn test_post_includes_create_only_properties() {
    let handler = HandlerMethod::new("createEvent", "/events")
        .method(HttpMethod::Post)
        .param(MethodParameter::request_body("event", event_type()));
    let affordances = AffordanceAssembler::new()
        .assemble(&handler, &Arguments::new())
        .unwrap();
    let names: Vec<&str> = affordances[0].parameters().map(|p| p.name()).collect();
    assert_eq!(names, vec!["performer", "eventStatus", "doorsOpen"]);
    assert!(affordances[0].input_parameters()[0].is_required());
}

#[test]
fn test_resource_links_expand() {
    let resource = Resource::new("Event", json!({"performer": "Walk off the Earth"}))
        .with_link(Link::new("/events/1", SELF_REL))
        .with_link(Link::new("/events/1/reviews{?page}", "reviews"));
    let reviews = &resource.links()[1];
    assert_eq!(reviews.expand(), "/events/1/reviews");
    assert_eq!(resource.self_link().map(Link::href), Some("/events/1"));
    assert_eq!(PageMetadata::new(5, 0, 11).total_pages, 3);
}
