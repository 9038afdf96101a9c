pub mod controller;
pub mod form;
pub mod pager;
pub mod params;
pub mod query;
pub mod render;
pub mod session;

pub use controller::{SearchController, SearchView};
pub use form::{ColorChoice, FilterForm};
pub use pager::{page_link, page_links, PageLink};
pub use params::{PageState, QueryParams, SearchFilters};
pub use query::{FilterExpression, ListingRequest, Predicate};
pub use render::{render_cards, CarCard};
pub use session::{FetchState, SearchSession, Ticket};
