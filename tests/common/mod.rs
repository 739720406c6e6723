// Shared fixture: a small trip-planning model.
//
//   NS.Person { Id: Int32 (key), Name: String, Age: Int32?, Emails: [String],
//               HomeAddress: NS.Address, Addresses: [NS.Address],
//               Trips -> NS.Trip (*), BestFriend -> NS.Person (0..1) }
//   NS.Manager : NS.Person { Budget: Decimal }
//   NS.Trip { TripId: Int32 (key), Description: String, Budget: Double }
//   NS.Airline { Code: String (key) }
//   NS.Address (complex) { City: String }
//
//   People: NS.Person, Trips: NS.Trip, Airlines: NS.Airline, Me: NS.Person
#![allow(dead_code)]

use std::rc::Rc;

use odata_semantic::ODataValue;
use odata_semantic::edm::{
    EntitySetExpression, InMemoryModel, Multiplicity, NavigationSourceId, OperationDef,
    OperationId, OperationImportId, OperationKind, OperationParameter, PrimitiveKind, PropertyId,
    StructuredTypeId, TypeRef,
};
use odata_semantic::nodes::{
    CollectionResourceNode, ConstantNode, EntitySetNode, RangeVariable,
    ResourceRangeVariable, ResourceRangeVariableReferenceNode, SingleResourceNode,
    SingleValueNode, SingleValuePropertyAccessNode,
};

pub struct Fixture {
    pub model: InMemoryModel,

    pub person: StructuredTypeId,
    pub manager: StructuredTypeId,
    pub trip: StructuredTypeId,
    pub airline: StructuredTypeId,
    pub address: StructuredTypeId,

    pub person_id: PropertyId,
    pub name: PropertyId,
    pub age: PropertyId,
    pub emails: PropertyId,
    pub home_address: PropertyId,
    pub addresses: PropertyId,
    pub trips: PropertyId,
    pub best_friend: PropertyId,
    pub manager_budget: PropertyId,
    pub trip_id: PropertyId,
    pub description: PropertyId,
    pub trip_budget: PropertyId,
    pub city: PropertyId,

    pub people: NavigationSourceId,
    pub trips_set: NavigationSourceId,
    pub airlines: NavigationSourceId,
    pub me: NavigationSourceId,

    pub get_friends: OperationId,
    pub get_age_int: OperationId,
    pub get_age_string: OperationId,
    pub reset: OperationId,
    pub reset_import: OperationImportId,
    pub top_people_import: OperationImportId,
}

fn int32(nullable: bool) -> TypeRef {
    TypeRef::primitive(PrimitiveKind::Int32, nullable)
}

fn string() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::String, true)
}

fn function(name: &str, bound_to: Option<TypeRef>, return_type: Option<TypeRef>) -> OperationDef {
    OperationDef {
        namespace: "NS".to_string(),
        name: name.to_string(),
        kind: OperationKind::Function,
        is_bound: bound_to.is_some(),
        is_composable: false,
        parameters: bound_to
            .into_iter()
            .map(|type_ref| OperationParameter {
                name: "person".to_string(),
                type_ref,
                optional: false,
            })
            .collect(),
        return_type,
        entity_set_path: None,
    }
}

pub fn fixture() -> Fixture {
    let mut model = InMemoryModel::new();

    let address = model.add_complex_type("NS", "Address", None);
    let city = model.add_structural_property(address, "City", string());

    let person = model.add_entity_type("NS", "Person", None);
    let manager = model.add_entity_type("NS", "Manager", Some(person));
    let trip = model.add_entity_type("NS", "Trip", None);
    let airline = model.add_entity_type("NS", "Airline", None);
    model.set_open(person, true);

    let person_id = model.add_key_property(person, "Id", int32(false));
    let name = model.add_structural_property(person, "Name", string());
    let age = model.add_structural_property(person, "Age", int32(true));
    let emails = model.add_structural_property(person, "Emails", TypeRef::collection(string()));
    let home_address = model.add_structural_property(person, "HomeAddress", TypeRef::complex(address, true));
    let addresses = model.add_structural_property(
        person,
        "Addresses",
        TypeRef::collection(TypeRef::complex(address, false)),
    );
    let trips = model.add_navigation_property(person, "Trips", trip, Multiplicity::Many, false);
    let best_friend =
        model.add_navigation_property(person, "BestFriend", person, Multiplicity::ZeroOrOne, false);
    let manager_budget = model.add_structural_property(
        manager,
        "Budget",
        TypeRef::primitive(PrimitiveKind::Decimal, false),
    );

    let trip_id = model.add_key_property(trip, "TripId", int32(false));
    let description = model.add_structural_property(trip, "Description", string());
    let trip_budget = model.add_structural_property(
        trip,
        "Budget",
        TypeRef::primitive(PrimitiveKind::Double, false),
    );
    model.add_key_property(airline, "Code", TypeRef::primitive(PrimitiveKind::String, false));

    let people = model.add_entity_set("People", person);
    let trips_set = model.add_entity_set("Trips", trip);
    let airlines = model.add_entity_set("Airlines", airline);
    let me = model.add_singleton("Me", person);
    model.add_navigation_binding(people, trips, None, trips_set);
    model.add_navigation_binding(people, best_friend, None, people);

    let person_ref = TypeRef::entity(person, false);
    let get_friends = model.add_operation(function(
        "GetFriends",
        Some(person_ref.clone()),
        Some(TypeRef::collection(person_ref.clone())),
    ));
    let get_age_int = model.add_operation(function("GetAge", Some(person_ref.clone()), Some(int32(false))));
    let get_age_string = model.add_operation(function("GetAge", Some(person_ref.clone()), Some(string())));
    let reset = model.add_operation(OperationDef {
        kind: OperationKind::Action,
        ..function("Reset", None, None)
    });
    let reset_import = model.add_operation_import("Reset", reset, None);
    let top_people = model.add_operation(function(
        "TopPeople",
        None,
        Some(TypeRef::collection(person_ref)),
    ));
    let top_people_import = model.add_operation_import(
        "TopPeople",
        top_people,
        Some(EntitySetExpression::Static(people)),
    );

    Fixture {
        model,
        person,
        manager,
        trip,
        airline,
        address,
        person_id,
        name,
        age,
        emails,
        home_address,
        addresses,
        trips,
        best_friend,
        manager_budget,
        trip_id,
        description,
        trip_budget,
        city,
        people,
        trips_set,
        airlines,
        me,
        get_friends,
        get_age_int,
        get_age_string,
        reset,
        reset_import,
        top_people_import,
    }
}

impl Fixture {
    /// `People` as a collection node.
    pub fn people_node(&self) -> Rc<CollectionResourceNode> {
        Rc::new(CollectionResourceNode::from(
            EntitySetNode::new(&self.model, self.people).unwrap(),
        ))
    }

    /// `$it` over `People`.
    pub fn it(&self) -> Rc<RangeVariable> {
        Rc::new(RangeVariable::Resource(
            ResourceRangeVariable::it(&self.model, self.people).unwrap(),
        ))
    }

    /// Reference to `$it` as a single resource.
    pub fn it_ref(&self) -> Rc<SingleResourceNode> {
        Rc::new(SingleResourceNode::from(
            ResourceRangeVariableReferenceNode::new(self.it()).unwrap(),
        ))
    }

    /// Reference to `$it` as a single value.
    pub fn it_value(&self) -> Rc<SingleValueNode> {
        Rc::new(SingleValueNode::Resource((*self.it_ref()).clone()))
    }

    /// `$it/<property>` for a primitive property.
    pub fn property(&self, property: PropertyId) -> Rc<SingleValueNode> {
        Rc::new(SingleValueNode::from(
            SingleValuePropertyAccessNode::new(&self.model, self.it_value(), property).unwrap(),
        ))
    }
}

pub fn constant(value: ODataValue) -> Rc<SingleValueNode> {
    Rc::new(SingleValueNode::from(ConstantNode::new(value)))
}
