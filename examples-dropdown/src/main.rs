//! Dropdown demo
//!
//! Builds a home page holding a dropdown (a toggle button and an empty
//! content panel), prints the rendered document, then replays it against an
//! in-memory target: start, click, stop, click again.
//!
//! Page options are read from the TOML file given as the first argument, if
//! any. Set `RUST_LOG=debug` to see composition and lifecycle events.

use std::cell::Cell;
use std::error::Error;
use std::rc::Rc;
use std::result::Result;

use sprig::pages::component::{Child, ComponentType, Node};
use sprig::pages::runtime::{COMPONENT, PAGE};
use sprig::prelude::*;
use tracing_subscriber::EnvFilter;

static BUTTON: ComponentType = ComponentType::new(
	"Button",
	Some(&COMPONENT),
	"class Button extends Component {}",
);

static DROPDOWN_BUTTON: ComponentType = ComponentType::new(
	"DropdownButton",
	Some(&BUTTON),
	"class DropdownButton extends Button {}",
);

static DROPDOWN: ComponentType = ComponentType::new(
	"Dropdown",
	Some(&COMPONENT),
	"class Dropdown extends Component {\n\topen() {\n\t\tconsole.log(\"open dropdown\");\n\t}\n}",
);

static HOME_PAGE: ComponentType = ComponentType::new(
	"HomePage",
	Some(&PAGE),
	"class HomePage extends Page {}",
);

/// The dropdown tree and the handler bound to its toggle.
struct Dropdown {
	root: Node,
	toggle: Node,
	opened: Rc<Cell<usize>>,
}

fn dropdown() -> sprig::pages::Result<Dropdown> {
	let opened = Rc::new(Cell::new(0));

	let toggle = Node::with_identity("button", "dropdown-button")?.of_type(&DROPDOWN_BUTTON)?;
	toggle.append_child("Menu")?;
	let counter = opened.clone();
	toggle.on("click", move |event: &Event| {
		counter.set(counter.get() + 1);
		tracing::info!("open dropdown (from '{}')", event.target());
	});

	let content = Node::with_identity("div", "dropdown-content")?.class("dropdown-content");

	let root = Node::with_identity("div", "dropdown")?
		.class("dropdown")
		.of_type(&DROPDOWN)?
		.with_children([&toggle, &content])?;

	Ok(Dropdown {
		root,
		toggle,
		opened,
	})
}

fn home_page(options: PageOptions, dropdown: &Dropdown) -> sprig::pages::Result<Page> {
	let mut page = Page::with_options(options)
		.root_type(&HOME_PAGE)
		.style(".dropdown-content { display: none; }");
	page.compose([Child::from("<h1>Home Page</h1>"), Child::from(&dropdown.root)])?;
	Ok(page)
}

fn load_options() -> Result<PageOptions, Box<dyn Error>> {
	match std::env::args().nth(1) {
		Some(path) => {
			let source = std::fs::read_to_string(&path)?;
			Ok(PageOptions::from_toml_str(&source)?)
		}
		None => Ok(PageOptions::new().title("Home")),
	}
}

fn main() -> Result<(), Box<dyn Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let dropdown = dropdown()?;
	let page = home_page(load_options()?, &dropdown)?;

	let html = page.render()?;
	println!("{}", html);

	let mut target = MemoryTarget::from_markup(&html);
	let mut lifecycle = Lifecycle::new();

	let started = page.start(&mut lifecycle, &mut target);
	tracing::info!("bound {} handler(s)", started.bound);

	target.dispatch(&dropdown.toggle.identity(), "click");

	let stopped = page.stop(&mut lifecycle, &mut target);
	tracing::info!("unbound {} handler(s)", stopped.unbound);

	target.dispatch(&dropdown.toggle.identity(), "click");
	tracing::info!("dropdown opened {} time(s)", dropdown.opened.get());

	Ok(())
}
