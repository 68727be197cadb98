//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use clinic_domain::catalog::Service;
use clinic_domain::error::{AuthError, ClinicError};
use clinic_domain::extra::{ExtraFields, merge};
use clinic_domain::id::{OrderId, ServiceId};
use clinic_domain::order::Order;
use clinic_domain::outcome::{UpdateOutcome, UpsertOutcome};
use clinic_domain::payment::{ChargeRequest, PaymentIntent, PaymentRecord};
use clinic_domain::review::Review;
use clinic_domain::user::{Identity, Role, User};

use crate::ports::{
    OrderRepository, PaymentLedger, PaymentProcessor, ReviewRepository, ServiceRepository,
    TokenCodec, UserRepository,
};

#[derive(Default)]
pub struct InMemoryServices {
    store: Mutex<Vec<Service>>,
}

impl ServiceRepository for InMemoryServices {
    fn create(&self, service: Service) -> impl Future<Output = Result<Service, ClinicError>> + Send {
        self.store.lock().unwrap().push(service.clone());
        async { Ok(service) }
    }

    fn get_by_id(
        &self,
        id: ServiceId,
    ) -> impl Future<Output = Result<Option<Service>, ClinicError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.iter().find(|s| s.id == id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Service>, ClinicError>> + Send {
        let result = self.store.lock().unwrap().clone();
        async { Ok(result) }
    }

    fn set_available(
        &self,
        id: ServiceId,
        available: bool,
    ) -> impl Future<Output = Result<UpsertOutcome, ClinicError>> + Send {
        let mut store = self.store.lock().unwrap();
        let outcome = if let Some(service) = store.iter_mut().find(|s| s.id == id) {
            service.available = available;
            UpsertOutcome::Updated
        } else {
            store.push(Service::placeholder(id, available));
            UpsertOutcome::Created
        };
        async move { Ok(outcome) }
    }

    fn delete(&self, id: ServiceId) -> impl Future<Output = Result<bool, ClinicError>> + Send {
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|s| s.id != id);
        let deleted = store.len() != before;
        async move { Ok(deleted) }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryOrders {
    store: Arc<Mutex<HashMap<OrderId, Order>>>,
}

impl OrderRepository for InMemoryOrders {
    fn create(&self, order: Order) -> impl Future<Output = Result<Order, ClinicError>> + Send {
        let mut store = self.store.lock().unwrap();
        let clash = store
            .values()
            .find(|existing| existing.slot_key() == order.slot_key())
            .map(|existing| existing.slot_key().taken());
        let result = match clash {
            Some(conflict) => Err(conflict.into()),
            None => {
                store.insert(order.id, order.clone());
                Ok(order)
            }
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<Order>, ClinicError>> + Send {
        let result = self.store.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Order>, ClinicError>> + Send {
        let result: Vec<Order> = self.store.lock().unwrap().values().cloned().collect();
        async { Ok(result) }
    }

    fn find_by_email(
        &self,
        email: String,
    ) -> impl Future<Output = Result<Vec<Order>, ClinicError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<Order> = store
            .values()
            .filter(|o| o.email == email)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn find_by_date(
        &self,
        date: String,
    ) -> impl Future<Output = Result<Vec<Order>, ClinicError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<Order> = store.values().filter(|o| o.date == date).cloned().collect();
        async { Ok(result) }
    }

    fn mark_shipped(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<UpdateOutcome, ClinicError>> + Send {
        let mut store = self.store.lock().unwrap();
        let outcome = match store.get_mut(&id) {
            Some(order) => {
                if order.mark_shipped() {
                    UpdateOutcome::modified_one()
                } else {
                    UpdateOutcome::unchanged_one()
                }
            }
            None => UpdateOutcome::default(),
        };
        async move { Ok(outcome) }
    }

    fn delete(&self, id: OrderId) -> impl Future<Output = Result<bool, ClinicError>> + Send {
        let deleted = self.store.lock().unwrap().remove(&id).is_some();
        async move { Ok(deleted) }
    }
}

/// Ledger sharing the order map of an [`InMemoryOrders`].
pub struct InMemoryLedger {
    orders: Arc<Mutex<HashMap<OrderId, Order>>>,
    records: Mutex<Vec<PaymentRecord>>,
}

impl InMemoryLedger {
    pub fn new(orders: &InMemoryOrders) -> Self {
        Self {
            orders: Arc::clone(&orders.store),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl PaymentLedger for InMemoryLedger {
    fn confirm(
        &self,
        order_id: OrderId,
        record: PaymentRecord,
    ) -> impl Future<Output = Result<UpdateOutcome, ClinicError>> + Send {
        let mut orders = self.orders.lock().unwrap();
        let outcome = match orders.get_mut(&order_id) {
            None => UpdateOutcome::default(),
            Some(order) => match order.mark_paid(record.transaction_id.clone()) {
                Ok(()) => {
                    self.records.lock().unwrap().push(record);
                    UpdateOutcome::modified_one()
                }
                Err(_) => UpdateOutcome::unchanged_one(),
            },
        };
        async move { Ok(outcome) }
    }

    fn find_by_transaction_id(
        &self,
        transaction_id: String,
    ) -> impl Future<Output = Result<Option<PaymentRecord>, ClinicError>> + Send {
        let records = self.records.lock().unwrap();
        let result = records
            .iter()
            .find(|r| r.transaction_id == transaction_id)
            .cloned();
        async { Ok(result) }
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    store: Mutex<HashMap<String, User>>,
}

impl InMemoryUsers {
    pub fn with_admin(email: &str) -> Self {
        let users = Self::default();
        let mut admin = User::new(email);
        admin.role = Role::Admin;
        users.store.lock().unwrap().insert(email.to_string(), admin);
        users
    }
}

impl UserRepository for InMemoryUsers {
    fn upsert(
        &self,
        email: String,
        profile: ExtraFields,
    ) -> impl Future<Output = Result<UpsertOutcome, ClinicError>> + Send {
        let mut store = self.store.lock().unwrap();
        let outcome = if let Some(user) = store.get_mut(&email) {
            merge(&mut user.profile, profile);
            UpsertOutcome::Updated
        } else {
            let mut user = User::new(email.clone());
            user.profile = profile;
            store.insert(email, user);
            UpsertOutcome::Created
        };
        async move { Ok(outcome) }
    }

    fn get_by_email(
        &self,
        email: String,
    ) -> impl Future<Output = Result<Option<User>, ClinicError>> + Send {
        let result = self.store.lock().unwrap().get(&email).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, ClinicError>> + Send {
        let result: Vec<User> = self.store.lock().unwrap().values().cloned().collect();
        async { Ok(result) }
    }

    fn set_role(
        &self,
        email: String,
        role: Role,
    ) -> impl Future<Output = Result<UpdateOutcome, ClinicError>> + Send {
        let mut store = self.store.lock().unwrap();
        let outcome = match store.get_mut(&email) {
            Some(user) if user.role == role => UpdateOutcome::unchanged_one(),
            Some(user) => {
                user.role = role;
                UpdateOutcome::modified_one()
            }
            None => UpdateOutcome::default(),
        };
        async move { Ok(outcome) }
    }
}

#[derive(Default)]
pub struct InMemoryReviews {
    store: Mutex<Vec<Review>>,
}

impl ReviewRepository for InMemoryReviews {
    fn create(&self, review: Review) -> impl Future<Output = Result<Review, ClinicError>> + Send {
        self.store.lock().unwrap().push(review.clone());
        async { Ok(review) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Review>, ClinicError>> + Send {
        let mut result = self.store.lock().unwrap().clone();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        async { Ok(result) }
    }
}

/// Tokens of the form `token:<email>`; anything else is rejected.
pub struct FakeTokens;

impl TokenCodec for FakeTokens {
    fn issue(&self, email: &str) -> Result<String, ClinicError> {
        Ok(format!("token:{email}"))
    }

    fn verify(&self, token: &str) -> Result<Identity, ClinicError> {
        token
            .strip_prefix("token:")
            .filter(|email| !email.is_empty())
            .map(Identity::new)
            .ok_or_else(|| AuthError::Unauthorized.into())
    }
}

/// Processor that records charges and optionally fails.
#[derive(Default)]
pub struct FakeProcessor {
    pub fail: bool,
    pub charges: Mutex<Vec<ChargeRequest>>,
}

impl PaymentProcessor for FakeProcessor {
    fn create_intent(
        &self,
        charge: ChargeRequest,
    ) -> impl Future<Output = Result<PaymentIntent, ClinicError>> + Send {
        let result = if self.fail {
            Err(ClinicError::payment(std::io::Error::other("card_declined")))
        } else {
            let secret = format!("pi_{}_secret", charge.amount);
            self.charges.lock().unwrap().push(charge);
            Ok(PaymentIntent {
                client_secret: secret,
            })
        };
        async { result }
    }
}
