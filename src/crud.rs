//! Resource lifecycle orchestration.
//!
//! Every managed object implements [`ResourceModel`], which converts its
//! configuration form to an API record and back. The generic procedures in
//! this module drive a [`ResourceApi`] through create, read, update,
//! delete, and import using only that contract, so the sequencing exists
//! once for all resources.
//!
//! Each procedure collects diagnostics as it goes. Warnings never stop a
//! procedure; the first error ends it and nothing further is written.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DeskError;
use crate::framework::{Diagnostic, Diagnostics, DynamicValue};
use crate::models::ApiResource;

/// Id type of the API record behind a resource model.
pub type ResourceId<M> = <<M as ResourceModel>::Api as ApiResource>::Id;

/// Configuration form of a managed object.
pub trait ResourceModel: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Wire record the model converts to.
    type Api: ApiResource;

    /// Name used in diagnostics and logs (`trigger`, `ticket form`, ...).
    const TYPE_NAME: &'static str;

    /// Builds the API record. Returns `None` once an error has been
    /// recorded in `diags`.
    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<Self::Api>;

    /// Overwrites the model from an API record.
    ///
    /// Attributes the API never returns (secrets) keep their current value.
    fn from_api_model(&mut self, api: Self::Api, diags: &mut Diagnostics);

    /// Id assigned by the API, once known.
    fn id(&self) -> Option<ResourceId<Self>>;
}

/// Remote operations for one kind of API record.
#[async_trait]
pub trait ResourceApi<A: ApiResource>: Send + Sync {
    /// Creates a record and returns it as stored.
    async fn create(&self, record: A) -> Result<A, DeskError>;

    /// Fetches a record by id.
    async fn read(&self, id: &A::Id) -> Result<A, DeskError>;

    /// Replaces a record and returns it as stored.
    async fn update(&self, id: &A::Id, record: A) -> Result<A, DeskError>;

    /// Deletes a record.
    async fn delete(&self, id: &A::Id) -> Result<(), DeskError>;
}

/// Input of [`create`].
#[derive(Debug, Clone, Default)]
pub struct CreateResourceRequest {
    /// Planned configuration.
    pub planned_state: DynamicValue,
}

/// Output of [`create`].
#[derive(Debug, Clone, Default)]
pub struct CreateResourceResponse {
    /// State to persist; `None` when the create did not complete.
    pub new_state: Option<DynamicValue>,
    /// Everything reported along the way.
    pub diagnostics: Diagnostics,
}

/// Input of [`read`].
#[derive(Debug, Clone, Default)]
pub struct ReadResourceRequest {
    /// State recorded by the previous apply.
    pub current_state: DynamicValue,
}

/// Output of [`read`].
#[derive(Debug, Clone, Default)]
pub struct ReadResourceResponse {
    /// Refreshed state; `None` when the refresh did not complete.
    pub new_state: Option<DynamicValue>,
    /// Everything reported along the way.
    pub diagnostics: Diagnostics,
}

/// Input of [`update`].
#[derive(Debug, Clone, Default)]
pub struct UpdateResourceRequest {
    /// State recorded by the previous apply; supplies the id.
    pub prior_state: DynamicValue,
    /// Planned configuration.
    pub planned_state: DynamicValue,
}

/// Output of [`update`].
#[derive(Debug, Clone, Default)]
pub struct UpdateResourceResponse {
    /// State to persist; `None` when the update did not complete.
    pub new_state: Option<DynamicValue>,
    /// Everything reported along the way.
    pub diagnostics: Diagnostics,
}

/// Input of [`delete`].
#[derive(Debug, Clone, Default)]
pub struct DeleteResourceRequest {
    /// State recorded by the previous apply.
    pub prior_state: DynamicValue,
}

/// Output of [`delete`].
#[derive(Debug, Clone, Default)]
pub struct DeleteResourceResponse {
    /// Everything reported along the way.
    pub diagnostics: Diagnostics,
}

/// Input of [`import`].
#[derive(Debug, Clone, Default)]
pub struct ImportResourceStateRequest {
    /// Identifier supplied by the user.
    pub id: String,
}

/// Output of [`import`].
#[derive(Debug, Clone, Default)]
pub struct ImportResourceStateResponse {
    /// Imported state; `None` when the import did not complete.
    pub state: Option<DynamicValue>,
    /// Everything reported along the way.
    pub diagnostics: Diagnostics,
}

fn call_failed(verb: &str, type_name: &str, err: &DeskError) -> Diagnostic {
    Diagnostic::error(
        format!("Error {verb} {type_name}"),
        format!("Error {verb} {type_name}: {err}"),
    )
}

fn require_id<M: ResourceModel>(model: &M) -> Result<ResourceId<M>, Diagnostic> {
    model.id().ok_or_else(|| {
        Diagnostic::error(
            "Missing resource id",
            format!("the {} state does not record an id", M::TYPE_NAME),
        )
    })
}

/// Converts `api` into `model` and serializes the result.
fn write_back<M: ResourceModel>(
    mut model: M,
    api: M::Api,
    diags: &mut Diagnostics,
) -> Option<DynamicValue> {
    model.from_api_model(api, diags);
    if diags.has_error() {
        return None;
    }
    let mut state = DynamicValue::null();
    diags.capture(state.set(&model))?;
    Some(state)
}

/// Creates the planned object.
pub async fn create<M, C>(client: &C, request: CreateResourceRequest) -> CreateResourceResponse
where
    M: ResourceModel,
    C: ResourceApi<M::Api> + ?Sized,
{
    let mut diagnostics = Diagnostics::new();
    let new_state = create_inner::<M, C>(client, request, &mut diagnostics).await;
    CreateResourceResponse {
        new_state,
        diagnostics,
    }
}

async fn create_inner<M, C>(
    client: &C,
    request: CreateResourceRequest,
    diags: &mut Diagnostics,
) -> Option<DynamicValue>
where
    M: ResourceModel,
    C: ResourceApi<M::Api> + ?Sized,
{
    let plan: M = diags.capture(request.planned_state.get())?;
    let record = plan.to_api_model(diags)?;
    if diags.has_error() {
        return None;
    }

    tracing::debug!(resource = M::TYPE_NAME, "creating");
    let created = match client.create(record).await {
        Ok(created) => created,
        Err(e) => {
            diags.push(call_failed("creating", M::TYPE_NAME, &e));
            return None;
        }
    };

    let state = write_back(plan, created, diags)?;
    tracing::debug!(resource = M::TYPE_NAME, "created");
    Some(state)
}

/// Refreshes recorded state from the API.
pub async fn read<M, C>(client: &C, request: ReadResourceRequest) -> ReadResourceResponse
where
    M: ResourceModel,
    C: ResourceApi<M::Api> + ?Sized,
{
    let mut diagnostics = Diagnostics::new();
    let new_state = read_inner::<M, C>(client, request, &mut diagnostics).await;
    ReadResourceResponse {
        new_state,
        diagnostics,
    }
}

async fn read_inner<M, C>(
    client: &C,
    request: ReadResourceRequest,
    diags: &mut Diagnostics,
) -> Option<DynamicValue>
where
    M: ResourceModel,
    C: ResourceApi<M::Api> + ?Sized,
{
    let current: M = diags.capture(request.current_state.get())?;
    let id = diags.capture(require_id(&current))?;

    tracing::debug!(resource = M::TYPE_NAME, %id, "reading");
    let fetched = match client.read(&id).await {
        Ok(fetched) => fetched,
        Err(e) => {
            diags.push(call_failed("reading", M::TYPE_NAME, &e));
            return None;
        }
    };

    write_back(current, fetched, diags)
}

/// Applies the planned configuration to the object recorded in the prior
/// state.
pub async fn update<M, C>(client: &C, request: UpdateResourceRequest) -> UpdateResourceResponse
where
    M: ResourceModel,
    C: ResourceApi<M::Api> + ?Sized,
{
    let mut diagnostics = Diagnostics::new();
    let new_state = update_inner::<M, C>(client, request, &mut diagnostics).await;
    UpdateResourceResponse {
        new_state,
        diagnostics,
    }
}

async fn update_inner<M, C>(
    client: &C,
    request: UpdateResourceRequest,
    diags: &mut Diagnostics,
) -> Option<DynamicValue>
where
    M: ResourceModel,
    C: ResourceApi<M::Api> + ?Sized,
{
    let plan: M = diags.capture(request.planned_state.get())?;
    let record = plan.to_api_model(diags)?;
    if diags.has_error() {
        return None;
    }

    let prior: M = diags.capture(request.prior_state.get())?;
    let id = diags.capture(require_id(&prior))?;

    tracing::debug!(resource = M::TYPE_NAME, %id, "updating");
    let updated = match client.update(&id, record).await {
        Ok(updated) => updated,
        Err(e) => {
            diags.push(call_failed("updating", M::TYPE_NAME, &e));
            return None;
        }
    };

    write_back(plan, updated, diags)
}

/// Deletes the object recorded in the prior state.
pub async fn delete<M, C>(client: &C, request: DeleteResourceRequest) -> DeleteResourceResponse
where
    M: ResourceModel,
    C: ResourceApi<M::Api> + ?Sized,
{
    let mut diagnostics = Diagnostics::new();
    delete_inner::<M, C>(client, request, &mut diagnostics).await;
    DeleteResourceResponse { diagnostics }
}

async fn delete_inner<M, C>(client: &C, request: DeleteResourceRequest, diags: &mut Diagnostics)
where
    M: ResourceModel,
    C: ResourceApi<M::Api> + ?Sized,
{
    let Some(prior) = diags.capture(request.prior_state.get::<M>()) else {
        return;
    };
    let Some(id) = diags.capture(require_id(&prior)) else {
        return;
    };

    tracing::debug!(resource = M::TYPE_NAME, %id, "deleting");
    if let Err(e) = client.delete(&id).await {
        diags.push(call_failed("deleting", M::TYPE_NAME, &e));
    }
}

/// Adopts an existing object by its id.
pub async fn import<M, C>(
    client: &C,
    request: ImportResourceStateRequest,
) -> ImportResourceStateResponse
where
    M: ResourceModel,
    C: ResourceApi<M::Api> + ?Sized,
{
    let mut diagnostics = Diagnostics::new();
    let state = import_inner::<M, C>(client, request, &mut diagnostics).await;
    ImportResourceStateResponse { state, diagnostics }
}

async fn import_inner<M, C>(
    client: &C,
    request: ImportResourceStateRequest,
    diags: &mut Diagnostics,
) -> Option<DynamicValue>
where
    M: ResourceModel,
    C: ResourceApi<M::Api> + ?Sized,
{
    let Ok(id) = request.id.trim().parse::<ResourceId<M>>() else {
        diags.add_error(
            "Invalid import id",
            format!("{:?} is not a valid {} id", request.id, M::TYPE_NAME),
        );
        return None;
    };

    tracing::debug!(resource = M::TYPE_NAME, %id, "importing");
    let fetched = match client.read(&id).await {
        Ok(fetched) => fetched,
        Err(e) => {
            diags.push(call_failed("reading", M::TYPE_NAME, &e));
            return None;
        }
    };

    write_back(M::default(), fetched, diags)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde::Deserialize;

    use super::*;
    use crate::framework::{AttributePath, Value};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: Option<i64>,
        name: String,
    }

    impl ApiResource for Widget {
        type Id = i64;
        const COLLECTION: &'static str = "widgets";
        const ENVELOPE: &'static str = "widget";
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct WidgetModel {
        #[serde(default)]
        id: Value<i64>,
        #[serde(default)]
        name: Value<String>,
    }

    impl ResourceModel for WidgetModel {
        type Api = Widget;
        const TYPE_NAME: &'static str = "widget";

        fn to_api_model(&self, diags: &mut Diagnostics) -> Option<Widget> {
            let name = diags.capture(self.name.require(&AttributePath::root("name")))?;
            Some(Widget {
                id: None,
                name: name.clone(),
            })
        }

        fn from_api_model(&mut self, api: Widget, _diags: &mut Diagnostics) {
            self.id = Value::from_option(api.id);
            self.name = Value::Known(api.name);
        }

        fn id(&self) -> Option<i64> {
            self.id.as_known().copied()
        }
    }

    #[derive(Default)]
    struct CountingApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ResourceApi<Widget> for CountingApi {
        async fn create(&self, record: Widget) -> Result<Widget, DeskError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Widget {
                id: Some(1),
                ..record
            })
        }

        async fn read(&self, id: &i64) -> Result<Widget, DeskError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DeskError::not_found("widgets", id.to_string()))
        }

        async fn update(&self, _id: &i64, record: Widget) -> Result<Widget, DeskError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(record)
        }

        async fn delete(&self, _id: &i64) -> Result<(), DeskError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_import_rejects_non_numeric_id_before_calling_api() {
        let api = CountingApi::default();
        let response = tokio_test::block_on(import::<WidgetModel, _>(
            &api,
            ImportResourceStateRequest {
                id: "abc".to_string(),
            },
        ));
        assert!(response.diagnostics.has_error());
        assert!(response.state.is_none());
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_create_stops_on_conversion_error() {
        let api = CountingApi::default();
        let response = tokio_test::block_on(create::<WidgetModel, _>(
            &api,
            CreateResourceRequest {
                planned_state: DynamicValue::new(serde_json::json!({"name": null})),
            },
        ));
        assert!(response.diagnostics.has_error());
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_read_wraps_api_error() {
        let api = CountingApi::default();
        let response = tokio_test::block_on(read::<WidgetModel, _>(
            &api,
            ReadResourceRequest {
                current_state: DynamicValue::new(serde_json::json!({"id": 9, "name": "w"})),
            },
        ));
        let diag = response.diagnostics.errors().next().unwrap();
        assert_eq!(diag.summary, "Error reading widget");
        assert!(diag.detail.contains("widgets not found: 9"));
        assert!(response.new_state.is_none());
    }

    #[test]
    fn test_delete_without_id_is_error() {
        let api = CountingApi::default();
        let response = tokio_test::block_on(delete::<WidgetModel, _>(
            &api,
            DeleteResourceRequest {
                prior_state: DynamicValue::new(serde_json::json!({"name": "w"})),
            },
        ));
        assert!(response.diagnostics.has_error());
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }
}
