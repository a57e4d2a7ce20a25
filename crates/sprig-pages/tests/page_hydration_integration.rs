//! Integration tests for page rendering and rebinding
//!
//! These tests drive the full flow a consumer sees:
//! 1. A tree is composed and mounted on a page
//! 2. The page renders head, body and script into one document
//! 3. The document is loaded into a rendering target
//! 4. `start` binds the registered handlers and `stop` releases them

use std::cell::Cell;
use std::rc::Rc;

use rstest::*;
use sprig_pages::component::{Child, ComponentType, Node};
use sprig_pages::prelude::*;
use sprig_pages::runtime::COMPONENT;

static DROPDOWN: ComponentType = ComponentType::new(
	"Dropdown",
	Some(&COMPONENT),
	"class Dropdown extends Component {\n\ttoggle() { this.open = !this.open; }\n}",
);
static BUTTON: ComponentType = ComponentType::new(
	"Button",
	Some(&COMPONENT),
	"class Button extends Component {}",
);

/// A container holding a button with a click handler and a literal.
struct Scenario {
	page: Page,
	container: Node,
	button: Node,
	handler: Callback,
	clicks: Rc<Cell<usize>>,
}

#[fixture]
fn scenario() -> Scenario {
	let clicks = Rc::new(Cell::new(0));

	let button = Node::with_identity("button", "btn").unwrap().of_type(&BUTTON).unwrap();
	button.append_child("Open").unwrap();
	let counter = clicks.clone();
	let handler = button.on("click", move |event: &Event| {
		assert_eq!(event.target(), "btn");
		counter.set(counter.get() + 1);
	});

	let container = Node::new("div").class("dropdown").of_type(&DROPDOWN).unwrap();
	container
		.compose([Child::from(&button), Child::from("hi")])
		.unwrap();

	let mut page = Page::new();
	page.add_child(&container).unwrap();

	Scenario {
		page,
		container,
		button,
		handler,
		clicks,
	}
}

/// Tests that the body carries the composed markup in order
#[rstest]
fn test_body_contains_composed_markup(scenario: Scenario) {
	let html = scenario.page.render().unwrap();
	let expected = format!(
		r#"<div id="{}" class="dropdown"><button id="btn">Open</button>hi</div>"#,
		scenario.container.identity()
	);
	assert!(html.contains(&expected));
	assert!(scenario.container.identity().starts_with("sp-"));
}

/// Tests that start binds the handler, stop unbinds it, and a later event
/// does not reach the handler
#[rstest]
fn test_start_then_stop_round_trip(scenario: Scenario) {
	let html = scenario.page.render().unwrap();
	let mut target = MemoryTarget::from_markup(&html);
	let mut lifecycle = Lifecycle::new();

	let started = lifecycle.start(&scenario.container, &mut target);
	assert_eq!(started.bound, 1);
	assert!(started.is_clean());
	assert!(lifecycle.is_bound(&scenario.button, "click", &scenario.handler));

	assert_eq!(target.dispatch("btn", "click"), 1);
	assert_eq!(scenario.clicks.get(), 1);

	let stopped = lifecycle.stop(&scenario.container, &mut target);
	assert_eq!(stopped.unbound, 1);
	assert!(!lifecycle.is_bound(&scenario.button, "click", &scenario.handler));

	assert_eq!(target.dispatch("btn", "click"), 0);
	assert_eq!(scenario.clicks.get(), 1);
}

/// Tests that restarting after stop rebinds the same handler once
#[rstest]
fn test_restart_rebinds_preserved_registrations(scenario: Scenario) {
	let mut target = MemoryTarget::from_markup(&scenario.page.render().unwrap());
	let mut lifecycle = Lifecycle::new();

	scenario.page.start(&mut lifecycle, &mut target);
	scenario.page.stop(&mut lifecycle, &mut target);
	let restarted = scenario.page.start(&mut lifecycle, &mut target);
	assert_eq!(restarted.bound, 1);

	target.dispatch("btn", "click");
	assert_eq!(scenario.clicks.get(), 1);
}

/// Tests that the shipped script declares every used type base-first and
/// ends with the entry point call
#[rstest]
fn test_script_ships_used_types(scenario: Scenario) {
	let bundle = scenario.page.shipped_bundle().unwrap();
	assert_eq!(
		bundle.type_names(),
		vec!["Entity", "Component", "Button", "Dropdown", "Page"]
	);

	let html = scenario.page.render().unwrap();
	let entity = html.find("class Entity").unwrap();
	let button = html.find("class Button extends Component").unwrap();
	let dropdown = html.find("class Dropdown extends Component").unwrap();
	let call = html.find("(Page);").unwrap();
	assert!(entity < button && button < dropdown && dropdown < call);
	assert_eq!(html.matches("class Component extends Entity").count(), 1);
}

/// Tests that a second page cannot mount an already mounted tree
#[rstest]
fn test_mounting_on_second_page_fails(scenario: Scenario) {
	let before = scenario.page.render().unwrap();

	let mut other = Page::new();
	let err = other.add_child(&scenario.container).unwrap_err();
	assert!(matches!(err, PagesError::AlreadyMounted { .. }));
	assert!(other.roots().is_empty());
	assert_eq!(scenario.page.render().unwrap(), before);
}

/// Tests that options loaded from TOML shape the document shell
#[test]
fn test_options_from_toml() {
	let options = PageOptions::from_toml_str(
		r#"
		lang = "de"
		title = "Menü"
		include_manifest = false
		"#,
	)
	.unwrap();

	let html = Page::with_options(options).render().unwrap();
	assert!(html.contains("<html lang=\"de\">"));
	assert!(html.contains("<title>Menü</title>"));
	assert!(!html.contains("application/json"));
}

/// Tests that a node appended while live is inserted, bound and rendered
#[rstest]
fn test_append_live_extends_page(scenario: Scenario) {
	let mut target = MemoryTarget::from_markup(&scenario.page.render().unwrap());
	let mut lifecycle = Lifecycle::new();
	scenario.page.start(&mut lifecycle, &mut target);

	let extra = Node::with_identity("button", "extra").unwrap().of_type(&BUTTON).unwrap();
	let extra_click = extra.on("click", |_: &Event| {});
	lifecycle
		.append_live(&scenario.container, &extra, &mut target)
		.unwrap();

	assert!(scenario.page.contains_identity("extra"));
	assert!(lifecycle.is_bound(&extra, "click", &extra_click));
	assert_eq!(target.dispatch("extra", "click"), 1);
	assert!(scenario.page.render_body().contains(r#"<button id="extra"></button>"#));
}
