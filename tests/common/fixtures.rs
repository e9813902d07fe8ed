/*!
 * Shared domain fixtures: app/input class pairs, their translation specs,
 * and backend helpers used across the unit and integration suites.
 */

use std::any::{Any, TypeId};
use std::path::Path;

use transwire::backend::{FormatBackend, MemoryBackend};
use transwire::class_ref::{ClassRef, EngineId};
use transwire::errors::{Result, SpecError};
use transwire::translation::{Engine, EngineBuilder, RawTranslationSpec, TranslationSpec};

// ---- primitive pair -----------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppX {
    pub n: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputX {
    pub n: i32,
}

#[derive(Debug)]
pub struct XSpec;

impl TranslationSpec for XSpec {
    type Input = InputX;
    type App = AppX;

    fn input_to_app(&self, _engine: &Engine, input: InputX) -> Result<AppX> {
        Ok(AppX { n: input.n })
    }

    fn app_to_input(&self, _engine: &Engine, app: AppX) -> Result<InputX> {
        Ok(InputX { n: app.n })
    }
}

// ---- string-field pair --------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecord {
    pub name: String,
    pub age: u32,
}

#[derive(Debug)]
pub struct PersonSpec;

impl TranslationSpec for PersonSpec {
    type Input = PersonRecord;
    type App = Person;

    fn input_to_app(&self, _engine: &Engine, input: PersonRecord) -> Result<Person> {
        Ok(Person {
            name: input.name,
            age: input.age,
        })
    }

    fn app_to_input(&self, _engine: &Engine, app: Person) -> Result<PersonRecord> {
        Ok(PersonRecord {
            name: app.name,
            age: app.age,
        })
    }
}

// ---- enum pair ----------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Active,
    Suspended { days: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusRecord {
    pub code: u8,
    pub days: u32,
}

#[derive(Debug)]
pub struct StatusSpec;

impl TranslationSpec for StatusSpec {
    type Input = StatusRecord;
    type App = Status;

    fn input_to_app(&self, _engine: &Engine, input: StatusRecord) -> Result<Status> {
        if input.code == 0 {
            Ok(Status::Active)
        } else {
            Ok(Status::Suspended { days: input.days })
        }
    }

    fn app_to_input(&self, _engine: &Engine, app: Status) -> Result<StatusRecord> {
        match app {
            Status::Active => Ok(StatusRecord { code: 0, days: 0 }),
            Status::Suspended { days } => Ok(StatusRecord { code: 1, days }),
        }
    }
}

// ---- nested pair --------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: u64,
    pub customer: Person,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub id: u64,
    pub customer: PersonRecord,
}

/// Spec with a nested field translated through the owning engine.
#[derive(Debug)]
pub struct OrderSpec;

impl TranslationSpec for OrderSpec {
    type Input = OrderRecord;
    type App = Order;

    fn input_to_app(&self, engine: &Engine, input: OrderRecord) -> Result<Order> {
        Ok(Order {
            id: input.id,
            customer: engine.translate(input.customer)?,
        })
    }

    fn app_to_input(&self, engine: &Engine, app: Order) -> Result<OrderRecord> {
        Ok(OrderRecord {
            id: app.id,
            customer: engine.translate(app.customer)?,
        })
    }
}

// ---- parent/child hierarchy ---------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
}

/// Subtype of `Report` for override purposes: translated under its
/// ancestor class when the parent/child map says so.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedReport {
    pub title: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    pub title: String,
}

/// Raw spec claiming the report pair; accepts `DetailedReport` objects too
/// so they can be dispatched under the `Report` class.
#[derive(Debug)]
pub struct ReportSpec;

impl RawTranslationSpec for ReportSpec {
    fn claimed_classes(&self) -> Vec<ClassRef> {
        vec![ClassRef::of::<ReportRecord>(), ClassRef::of::<Report>()]
    }

    fn spec_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn spec_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn translate(
        &self,
        _engine: &Engine,
        object: Box<dyn Any + Send>,
    ) -> Result<Box<dyn Any + Send>> {
        let object = match object.downcast::<ReportRecord>() {
            Ok(record) => {
                return Ok(Box::new(Report {
                    title: record.title,
                }));
            }
            Err(object) => object,
        };
        let object = match object.downcast::<Report>() {
            Ok(report) => {
                return Ok(Box::new(ReportRecord {
                    title: report.title,
                }));
            }
            Err(object) => object,
        };
        match object.downcast::<DetailedReport>() {
            Ok(detailed) => Ok(Box::new(ReportRecord {
                title: detailed.title,
            })),
            Err(_) => Err(SpecError::UnexpectedObjectType {
                spec_type: std::any::type_name::<Self>(),
                input: ClassRef::of::<ReportRecord>(),
                app: ClassRef::of::<Report>(),
            }
            .into()),
        }
    }
}

// ---- backends -----------------------------------------------------------

/// A second backend type, so orchestrator tests can attach two engines
/// with distinct engine classes.
#[derive(Debug)]
pub struct AltBackend {
    pub inner: MemoryBackend,
}

impl AltBackend {
    pub fn working() -> Self {
        AltBackend {
            inner: standard_backend(),
        }
    }
}

impl FormatBackend for AltBackend {
    fn raw_read(&self, path: &Path, class: ClassRef) -> Result<Box<dyn Any + Send>> {
        self.inner.raw_read(path, class)
    }

    fn raw_write(&self, path: &Path, object: &dyn Any) -> Result<()> {
        self.inner.raw_write(path, object)
    }
}

/// A memory backend with every fixture wire class registered.
pub fn standard_backend() -> MemoryBackend {
    MemoryBackend::working()
        .register_class::<InputX>()
        .register_class::<PersonRecord>()
        .register_class::<StatusRecord>()
        .register_class::<OrderRecord>()
        .register_class::<ReportRecord>()
}

/// An engine with every fixture spec registered over the given backend.
pub fn standard_engine<B: FormatBackend + 'static>(id: &str, backend: B) -> Engine {
    let mut builder = EngineBuilder::new();
    builder.add_translation_spec(XSpec).unwrap();
    builder.add_translation_spec(PersonSpec).unwrap();
    builder.add_translation_spec(StatusSpec).unwrap();
    builder.add_translation_spec(OrderSpec).unwrap();
    builder.add_raw_spec(std::sync::Arc::new(ReportSpec)).unwrap();
    builder
        .add_parent_child(ClassRef::of::<DetailedReport>(), ClassRef::of::<Report>())
        .unwrap();
    builder.build(EngineId::new(id), backend).unwrap()
}
