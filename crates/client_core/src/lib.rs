pub mod bills;
pub mod error;
pub mod gateway;
pub mod http_gateway;
pub mod memory_gateway;
pub mod new_bill;
pub mod ports;
pub mod router;
pub mod session;
pub mod view;

pub use bills::{sort_bills_by_date_desc, BillsListController, BillsListState, BillsView};
pub use error::{ClientError, StorageError, ValidationError};
pub use gateway::{BillGateway, GatewayError, ReceiptFile};
pub use http_gateway::HttpBillGateway;
pub use memory_gateway::{fixture_bills, InMemoryBillGateway};
pub use new_bill::{NewBillController, NewBillForm, NewBillState, NewBillView};
pub use ports::{ChannelNavigator, NavigationPort, PreviewPort};
pub use router::{
    active_icon, is_icon_active, MountedView, NavIcon, Navigation, Route, Router, Services,
};
pub use session::{FileStorage, KeyValueStore, LocalSessionStore, MemoryStorage, SessionStore};
