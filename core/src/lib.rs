pub mod browser;
pub mod discovery;
pub mod export;
pub mod mapper;
pub mod probe;
pub mod resolver;
pub mod sc;

pub use browser::NetViewBrowser;
pub use export::{CsvSink, InventorySink, XmlSink};
pub use mapper::{MapperEvent, NetworkServiceMapper};
pub use probe::{ServiceProbe, ServiceProbes};
pub use sc::ScServiceManager;
