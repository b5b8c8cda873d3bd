use lidflow_client::HttpContactApi;
use lidflow_core_contact_impl::ContactServiceImpl;
use lidflow_extern_impl::telegram::TelegramApiServiceImpl;
use lidflow_shared_impl::relay_config::RelayConfigServiceImpl;

// API
pub type RestServer = lidflow_api_rest::RestServer<Contact>;

// Client
pub type ContactForm = lidflow_client::ContactForm<HttpContactApi>;

// Extern
pub type TelegramApi = TelegramApiServiceImpl;

// Shared
pub type RelayConfig = RelayConfigServiceImpl;

// Core
pub type Contact = ContactServiceImpl<TelegramApi, RelayConfig>;
