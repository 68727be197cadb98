//! Shared application state for axum handlers.

use std::sync::Arc;

use clinic_app::ports::{
    OrderRepository, PaymentLedger, PaymentProcessor, ReviewRepository, ServiceRepository,
    TokenCodec, UserRepository,
};
use clinic_app::services::availability_service::AvailabilityService;
use clinic_app::services::catalog_service::CatalogService;
use clinic_app::services::identity_service::IdentityService;
use clinic_app::services::order_service::OrderService;
use clinic_app::services::payment_service::PaymentService;
use clinic_app::services::review_service::ReviewService;
use clinic_app::services::user_service::UserService;

/// The set of concrete port implementations the server runs with.
///
/// Bundling them behind one trait keeps handler signatures to a single type
/// parameter while still avoiding dynamic dispatch.
pub trait Adapters: Send + Sync + 'static {
    type Services: ServiceRepository + Send + Sync + 'static;
    type Orders: OrderRepository + Send + Sync + 'static;
    type Users: UserRepository + Send + Sync + 'static;
    type Reviews: ReviewRepository + Send + Sync + 'static;
    type Ledger: PaymentLedger + Send + Sync + 'static;
    type Processor: PaymentProcessor + Send + Sync + 'static;
    type Tokens: TokenCodec + Send + Sync + 'static;
}

/// Port instances handed to [`AppState::new`].
pub struct Ports<A: Adapters> {
    pub services: A::Services,
    pub orders: A::Orders,
    pub users: A::Users,
    pub reviews: A::Reviews,
    pub ledger: A::Ledger,
    pub processor: A::Processor,
    pub tokens: A::Tokens,
}

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`: only the `Arc` wrappers are cloned.
pub struct AppState<A: Adapters> {
    pub catalog: Arc<CatalogService<Arc<A::Services>>>,
    pub availability: Arc<AvailabilityService<Arc<A::Services>, Arc<A::Orders>>>,
    pub orders: Arc<OrderService<Arc<A::Orders>>>,
    pub payments: Arc<PaymentService<A::Ledger, A::Processor>>,
    pub identity: Arc<IdentityService<Arc<A::Users>, Arc<A::Tokens>>>,
    pub users: Arc<UserService<Arc<A::Users>, Arc<A::Tokens>>>,
    pub reviews: Arc<ReviewService<A::Reviews>>,
}

impl<A: Adapters> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            availability: Arc::clone(&self.availability),
            orders: Arc::clone(&self.orders),
            payments: Arc::clone(&self.payments),
            identity: Arc::clone(&self.identity),
            users: Arc::clone(&self.users),
            reviews: Arc::clone(&self.reviews),
        }
    }
}

impl<A: Adapters> AppState<A> {
    /// Build every application service over the given ports.
    ///
    /// `currency` is the ISO 4217 code payment intents are created in.
    pub fn new(ports: Ports<A>, currency: impl Into<String>) -> Self {
        let services = Arc::new(ports.services);
        let orders = Arc::new(ports.orders);
        let users = Arc::new(ports.users);
        let tokens = Arc::new(ports.tokens);

        Self {
            catalog: Arc::new(CatalogService::new(Arc::clone(&services))),
            availability: Arc::new(AvailabilityService::new(services, Arc::clone(&orders))),
            orders: Arc::new(OrderService::new(orders)),
            payments: Arc::new(PaymentService::new(ports.ledger, ports.processor, currency)),
            identity: Arc::new(IdentityService::new(Arc::clone(&users), Arc::clone(&tokens))),
            users: Arc::new(UserService::new(users, tokens)),
            reviews: Arc::new(ReviewService::new(ports.reviews)),
        }
    }
}
