use super::common::{student, student_registry};
use parking_lot::Mutex;
use sif_adk::exception::{codes, ErrorCategory, SifError};
use sif_adk::messaging::{
    broadcast_event, DataObjectOutput, Event, EventAction, MessageInfo, Publisher, QueryResults,
    Subscriber, VecDataObjectOutput, Zone, ZoneContext,
};
use sif_adk::provisioning::{ContextRegistry, PublishingOptions};
use sif_adk::query::{ComparisonOperator, Query};
use sif_adk::{
    AdkException, AgentProperties, ElementTree, SifValue, SifVersion, ZoneProperties,
};
use std::sync::Arc;

struct TestZone {
    id: String,
    properties: ZoneProperties,
    offline: bool,
    events: Mutex<Vec<EventAction>>,
}

impl TestZone {
    fn new(id: &str, offline: bool) -> Arc<TestZone> {
        Arc::new(Self {
            id: id.to_string(),
            properties: AgentProperties::new().zone_properties(),
            offline,
            events: Mutex::new(Vec::new()),
        })
    }
}

impl ZoneContext for TestZone {
    fn zone_id(&self) -> &str {
        &self.id
    }
}

impl Zone for TestZone {
    fn properties(&self) -> &ZoneProperties {
        &self.properties
    }

    fn report_event(&self, event: &Event) -> Result<(), AdkException> {
        if self.offline {
            return Err(AdkException::from_sif_error(SifError::new(
                ErrorCategory::Transport,
                codes::GENERIC,
                "zone unreachable",
            )));
        }
        self.events.lock().push(event.action());
        Ok(())
    }
}

struct StudentPublisher {
    students: Vec<ElementTree>,
}

impl Publisher for StudentPublisher {
    fn on_request(
        &self,
        query: &Query,
        output: &mut dyn DataObjectOutput,
        _zone: &dyn Zone,
        info: &MessageInfo,
    ) -> Result<(), AdkException> {
        if !query.accepts_version(info.version) {
            output.set_error(SifError::new(
                ErrorCategory::RequestResponse,
                codes::request_response::UNSUPPORTED_VERSION,
                "version not supported",
            ));
            return Ok(());
        }
        for student in self.students.iter().filter(|s| query.evaluate(s)) {
            output.write(student)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Collector {
    received: Mutex<Vec<String>>,
}

impl Subscriber for Collector {
    fn on_event(
        &self,
        event: &Event,
        _zone: &dyn Zone,
        _info: &MessageInfo,
    ) -> Result<(), AdkException> {
        for object in event.objects() {
            self.received
                .lock()
                .push(object.key().unwrap_or_default());
        }
        Ok(())
    }
}

impl QueryResults for Collector {
    fn on_query_results(
        &self,
        data: &[ElementTree],
        error: Option<&SifError>,
        _zone: &dyn Zone,
        _info: &MessageInfo,
    ) -> Result<(), AdkException> {
        if let Some(error) = error {
            return Err(AdkException::from_sif_error(error.clone()));
        }
        self.received
            .lock()
            .extend(data.iter().filter_map(|d| d.key()));
        Ok(())
    }
}

fn publisher() -> StudentPublisher {
    let registry = student_registry();
    StudentPublisher {
        students: vec![
            student(&registry, "S1", "Jane", "Doe"),
            student(&registry, "S2", "John", "Roe"),
            student(&registry, "S3", "Jane", "Poe"),
        ],
    }
}

#[test]
fn test_publisher_answers_query_with_restricted_fields() {
    let publisher = publisher();
    let zone = TestZone::new("District", false);
    let info = MessageInfo::new("sis-agent", "MSG-1", SifVersion::SIF21);

    let mut query = Query::new("StudentPersonal");
    query.add_condition("Name.FirstName", ComparisonOperator::Equals, "Jane");
    query.add_field_restriction("Name.LastName");
    let mut output = VecDataObjectOutput::for_query(&query);
    publisher
        .on_request(&query, &mut output, zone.as_ref(), &info)
        .unwrap();

    let objects = output.into_objects();
    assert_eq!(objects.len(), 2);
    let first = &objects[0];
    assert_eq!(first.key(), Some("S1".to_string()));
    assert!(first.field("Active").is_none());
    let name = first.child("Name").unwrap();
    let name = name.as_tree().unwrap();
    assert!(name.field("FirstName").is_none());
    assert_eq!(
        name.field_value("LastName"),
        Some(SifValue::string("Doe"))
    );

    // the publisher's own objects are untouched
    assert!(publisher.students[0].field("Active").is_some());
}

#[test]
fn test_publisher_reports_unsupported_version() {
    let publisher = publisher();
    let zone = TestZone::new("District", false);
    let info = MessageInfo::new("sis-agent", "MSG-2", SifVersion::SIF15R1);
    let query = Query::new("StudentPersonal").with_versions([SifVersion::SIF21]);

    let mut output = VecDataObjectOutput::for_query(&query);
    publisher
        .on_request(&query, &mut output, zone.as_ref(), &info)
        .unwrap();
    assert!(output.objects().is_empty());
    let error = output.error().unwrap();
    assert_eq!(error.category, ErrorCategory::RequestResponse);

    let collector = Collector::default();
    let err = collector
        .on_query_results(output.objects(), output.error(), zone.as_ref(), &info)
        .unwrap_err();
    assert!(err.has_error_code(
        ErrorCategory::RequestResponse,
        codes::request_response::UNSUPPORTED_VERSION
    ));
}

#[test]
fn test_event_broadcast_reaches_every_online_zone() {
    let publisher = publisher();
    let online = TestZone::new("North", false);
    let offline = TestZone::new("South", true);
    let also_online = TestZone::new("East", false);
    let zones: Vec<Arc<dyn Zone>> = vec![
        online.clone() as Arc<dyn Zone>,
        offline as Arc<dyn Zone>,
        also_online.clone() as Arc<dyn Zone>,
    ];

    let contexts = ContextRegistry::new();
    let options = PublishingOptions::new(&contexts);
    assert!(options.send_events());
    assert!(options.provisioning().supports_context("SIF_Default"));

    let event = Event::new(EventAction::Change, publisher.students.clone())
        .in_context(contexts.default_context());
    let err = broadcast_event(&zones, &event).unwrap_err();

    assert_eq!(online.events.lock().as_slice(), &[EventAction::Change]);
    assert_eq!(also_online.events.lock().as_slice(), &[EventAction::Change]);
    assert_eq!(err.children().len(), 1);
    let failure = err.children()[0].as_adk().unwrap();
    assert_eq!(failure.zone_id(), Some("South"));
    assert!(err.has_error(ErrorCategory::Transport));
}

#[test]
fn test_subscriber_receives_event_objects() {
    let publisher = publisher();
    let zone = TestZone::new("North", false);
    let info = MessageInfo::new("sis-agent", "MSG-3", SifVersion::SIF21);
    let event = Event::new(EventAction::Add, publisher.students.clone());
    assert_eq!(event.object_type(), Some("StudentPersonal".to_string()));
    assert_eq!(event.context_name(), "SIF_Default");

    let collector = Collector::default();
    collector.on_event(&event, zone.as_ref(), &info).unwrap();
    assert_eq!(
        collector.received.lock().as_slice(),
        &["S1".to_string(), "S2".to_string(), "S3".to_string()]
    );
}
