//! In-memory port implementations shared by the unit tests.

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use uuid::Uuid;

use flowkit_domain::attribute::AttributeDefinition;
use flowkit_domain::entity::Entity;
use flowkit_domain::entity_type::EntityType;
use flowkit_domain::error::FlowError;
use flowkit_domain::group::{GroupMember, GroupRole};
use flowkit_domain::id::{ActivityTypeId, AttributeId, EntityTypeId, GroupId, GroupRoleId, PersonId};
use flowkit_domain::person::{Person, PersonAlias};
use flowkit_domain::group::Group;
use flowkit_domain::workflow::ActivityType;

use crate::loader::{ContextBound, ServiceCatalog, ServiceDescriptor, Unconstructible};
use crate::merge_fields::MergeFields;
use crate::ports::{
    ActivityTypeRepository, AttributeRepository, ContextFactory, EntityService,
    EntityTypeRepository, GroupMemberRepository, GroupRoleRepository, Loadable, PersistenceContext,
    ServiceInstance, TemplateResolver,
};

fn unavailable(reason: &str) -> FlowError {
    FlowError::Storage(Box::new(std::io::Error::other(reason.to_string())))
}

/// Entity rows keyed by kind and guid, plus switches to simulate outages.
pub(crate) struct MemoryStore {
    rows: Mutex<HashMap<(&'static str, Uuid), Value>>,
    available: AtomicBool,
    accepting: AtomicBool,
    pub contexts_opened: AtomicUsize,
    pub contexts_live: AtomicUsize,
}

impl MemoryStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            accepting: AtomicBool::new(true),
            contexts_opened: AtomicUsize::new(0),
            contexts_live: AtomicUsize::new(0),
        })
    }

    pub fn add<E: Entity>(&self, entity: &E) {
        let value = serde_json::to_value(entity).unwrap();
        self.rows
            .lock()
            .unwrap()
            .insert((E::ENTITY_TYPE, entity.guid()), value);
    }

    pub fn add_person(&self, person: Person) {
        self.add(&person);
    }

    pub fn add_group(&self, group: Group) {
        self.add(&group);
    }

    /// Simulate the store failing every query.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Simulate the store refusing new contexts.
    pub fn set_accepting_connections(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }
}

/// A session against [`MemoryStore`]; tracks how many are open.
pub(crate) struct MemoryContext {
    store: Arc<MemoryStore>,
}

impl MemoryContext {
    pub fn open(store: &Arc<MemoryStore>) -> Result<Self, FlowError> {
        if !store.accepting.load(Ordering::SeqCst) {
            return Err(unavailable("connection refused"));
        }
        store.contexts_opened.fetch_add(1, Ordering::SeqCst);
        store.contexts_live.fetch_add(1, Ordering::SeqCst);
        Ok(Self {
            store: Arc::clone(store),
        })
    }

    fn fetch<E: Entity>(&self, guid: Uuid) -> Result<Option<E>, FlowError> {
        if !self.store.available.load(Ordering::SeqCst) {
            return Err(unavailable("store unavailable"));
        }
        let rows = self.store.rows.lock().unwrap();
        rows.get(&(E::ENTITY_TYPE, guid))
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(FlowError::from)
    }
}

impl Drop for MemoryContext {
    fn drop(&mut self) {
        self.store.contexts_live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PersistenceContext for MemoryContext {
    fn kind(&self) -> &'static str {
        "memory"
    }
}

pub(crate) struct MemoryContextFactory {
    store: Arc<MemoryStore>,
}

impl MemoryContextFactory {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl ContextFactory for MemoryContextFactory {
    type Context = MemoryContext;

    fn open(&self) -> impl Future<Output = Result<MemoryContext, FlowError>> + Send {
        let context = MemoryContext::open(&self.store);
        async move { context }
    }
}

/// Generic in-memory service for any entity kind.
pub(crate) struct MemoryService<E> {
    context: MemoryContext,
    _entity: PhantomData<fn() -> E>,
}

impl<E> MemoryService<E> {
    pub fn new(context: MemoryContext) -> Self {
        Self {
            context,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity + Send> EntityService for MemoryService<E> {
    type Entity = E;

    fn get(&mut self, guid: Uuid) -> impl Future<Output = Result<Option<E>, FlowError>> + Send {
        let result = self.context.fetch::<E>(guid);
        async move { result }
    }
}

pub(crate) type MemoryPersonService = MemoryService<Person>;

/// A service with no load-by-guid operation.
pub(crate) struct NoteService {
    _context: MemoryContext,
}

impl NoteService {
    pub fn new(context: MemoryContext) -> Self {
        Self { _context: context }
    }
}

impl ServiceInstance for NoteService {
    fn service_name(&self) -> &str {
        "NoteService"
    }
}

/// Catalog over [`MemoryStore`]: `Person` and `PersonAlias` declared
/// directly, `Group` through a generic base, `AuditLog` without a
/// constructor, and `Note` without a load operation.
pub(crate) fn memory_catalog(store: &Arc<MemoryStore>) -> ServiceCatalog {
    let group_base =
        Arc::new(ServiceDescriptor::new("MemoryService<Group>", "app::testing").over("Group"));
    ServiceCatalog::builder()
        .register(ContextBound::new(
            ServiceDescriptor::new("MemoryPersonService", "app::testing").over("Person"),
            MemoryContextFactory::new(Arc::clone(store)),
            |context| Loadable::new(MemoryService::<Person>::new(context)),
        ))
        .register(ContextBound::new(
            ServiceDescriptor::new("MemoryPersonAliasService", "app::testing").over("PersonAlias"),
            MemoryContextFactory::new(Arc::clone(store)),
            |context| Loadable::new(MemoryService::<PersonAlias>::new(context)),
        ))
        .register(ContextBound::new(
            ServiceDescriptor::new("MemoryGroupService", "app::testing").extending(group_base),
            MemoryContextFactory::new(Arc::clone(store)),
            |context| Loadable::new(MemoryService::<Group>::new(context)),
        ))
        .register(Unconstructible::new(
            ServiceDescriptor::new("AuditLogService", "app::testing").over("AuditLog"),
        ))
        .register(ContextBound::new(
            ServiceDescriptor::new("NoteService", "app::testing").over("Note"),
            MemoryContextFactory::new(Arc::clone(store)),
            NoteService::new,
        ))
        .build()
}

/// Renders `{{ dotted.path }}` placeholders; missing values render empty.
pub(crate) struct PathTemplates;

impl TemplateResolver for PathTemplates {
    fn resolve(&self, template: &str, fields: &MergeFields) -> Result<String, FlowError> {
        let root = fields.clone().into_value();
        let mut out = String::new();
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| FlowError::Template(Box::new(std::io::Error::other("unclosed tag"))))?;
            let value = after[..end]
                .trim()
                .split('.')
                .try_fold(&root, |value, segment| value.get(segment));
            match value {
                Some(Value::String(text)) => out.push_str(text),
                Some(Value::Null) | None => {}
                Some(other) => out.push_str(&other.to_string()),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[derive(Default)]
pub(crate) struct MemoryAttributes(Mutex<HashMap<AttributeId, AttributeDefinition>>);

impl MemoryAttributes {
    pub fn with(self, attribute: &AttributeDefinition) -> Self {
        self.0.lock().unwrap().insert(attribute.id, attribute.clone());
        self
    }
}

impl AttributeRepository for MemoryAttributes {
    fn get_by_id(
        &self,
        id: AttributeId,
    ) -> impl Future<Output = Result<Option<AttributeDefinition>, FlowError>> + Send {
        let result = self.0.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }
}

#[derive(Default)]
pub(crate) struct MemoryEntityTypes(Mutex<Vec<EntityType>>);

impl MemoryEntityTypes {
    pub fn with(self, entity_type: &EntityType) -> Self {
        self.0.lock().unwrap().push(entity_type.clone());
        self
    }
}

impl EntityTypeRepository for MemoryEntityTypes {
    fn get_by_id(
        &self,
        id: EntityTypeId,
    ) -> impl Future<Output = Result<Option<EntityType>, FlowError>> + Send {
        let result = self.0.lock().unwrap().iter().find(|t| t.id == id).cloned();
        async { Ok(result) }
    }

    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<EntityType>, FlowError>> + Send {
        let result = self
            .0
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .cloned();
        async { Ok(result) }
    }
}

#[derive(Default)]
pub(crate) struct MemoryActivityTypes(Mutex<HashMap<ActivityTypeId, ActivityType>>);

impl MemoryActivityTypes {
    pub fn with(self, activity_type: &ActivityType) -> Self {
        self.0
            .lock()
            .unwrap()
            .insert(activity_type.id, activity_type.clone());
        self
    }
}

impl ActivityTypeRepository for MemoryActivityTypes {
    fn get_by_id(
        &self,
        id: ActivityTypeId,
    ) -> impl Future<Output = Result<Option<ActivityType>, FlowError>> + Send {
        let result = self.0.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }
}

#[derive(Default)]
pub(crate) struct MemoryGroupMembers(Mutex<Vec<GroupMember>>);

impl MemoryGroupMembers {
    pub fn with(self, member: GroupMember) -> Self {
        self.0.lock().unwrap().push(member);
        self
    }
}

impl GroupMemberRepository for MemoryGroupMembers {
    fn find_by_group_and_person(
        &self,
        group_id: GroupId,
        person_id: PersonId,
    ) -> impl Future<Output = Result<Vec<GroupMember>, FlowError>> + Send {
        let result: Vec<GroupMember> = self
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.group_id == group_id && m.person_id == person_id)
            .cloned()
            .collect();
        async { Ok(result) }
    }
}

#[derive(Default)]
pub(crate) struct MemoryGroupRoles(Mutex<HashMap<GroupRoleId, GroupRole>>);

impl MemoryGroupRoles {
    pub fn with(self, role: &GroupRole) -> Self {
        self.0.lock().unwrap().insert(role.id, role.clone());
        self
    }
}

impl GroupRoleRepository for MemoryGroupRoles {
    fn get_by_id(
        &self,
        id: GroupRoleId,
    ) -> impl Future<Output = Result<Option<GroupRole>, FlowError>> + Send {
        let result = self.0.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }
}
