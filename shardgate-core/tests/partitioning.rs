use shardgate_core::{
    index_operations, parse_description_str, partition, DocumentFormat, OperationClassifier,
    OperationRole, SchemaFormat, SchemaIndex,
};

const DESCRIPTION: &str = r#"
openapi: 3.0.0
info:
  title: Users
  version: 1.0.0
paths:
  /users/{id}:
    parameters:
      - name: id
        in: path
        required: true
        schema: { type: string }
    get:
      operationId: getUser
    delete:
      operationId: deleteUser
  /users:
    post:
      operationId: createUser
    get:
      operationId: listUsers
  /reports:
    get:
      operationId: ghostOp
"#;

const SCHEMA: &str = r#"
type User { id: ID! name: String }
type Query {
  getUser(id: ID!): User
  listUsers: [User]
}
type Mutation {
  createUser(name: String): User
  deleteUser(id: ID!): Boolean
}
"#;

#[test]
fn description_to_batches() {
    let parsed = parse_description_str(DESCRIPTION, DocumentFormat::Auto).unwrap();
    let indexed = index_operations(&parsed.document).unwrap();
    let schema = SchemaIndex::parse(SCHEMA, SchemaFormat::Auto).unwrap();

    let (descriptors, diagnostics) = OperationClassifier::new(&schema).classify_all(indexed);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].operation_id.as_deref(), Some("ghostOp"));

    let roles: Vec<_> = descriptors
        .iter()
        .map(|d| (d.operation_id.as_str(), d.role))
        .collect();
    assert_eq!(
        roles,
        vec![
            ("getUser", OperationRole::Query),
            ("deleteUser", OperationRole::Mutation),
            ("createUser", OperationRole::Mutation),
            ("listUsers", OperationRole::Query),
            ("ghostOp", OperationRole::Query),
        ]
    );

    let batches = partition(descriptors, 2).unwrap();
    let ids: Vec<Vec<&str>> = batches
        .iter()
        .map(|b| b.operations.iter().map(|o| o.operation_id.as_str()).collect())
        .collect();
    assert_eq!(
        ids,
        vec![
            vec!["getUser", "deleteUser"],
            vec!["createUser", "listUsers"],
            vec!["ghostOp"],
        ]
    );
}

#[test]
fn introspection_and_sdl_classify_the_same_way() {
    let introspection = r#"{
      "data": {
        "__schema": {
          "queryType": { "name": "Query" },
          "mutationType": { "name": "Mutation" },
          "types": [
            { "name": "Query", "fields": [{ "name": "getUser" }, { "name": "listUsers" }] },
            { "name": "Mutation", "fields": [{ "name": "createUser" }, { "name": "deleteUser" }] }
          ]
        }
      }
    }"#;
    let from_json = SchemaIndex::parse(introspection, SchemaFormat::Auto).unwrap();
    let from_sdl = SchemaIndex::parse(SCHEMA, SchemaFormat::Sdl).unwrap();

    for op in ["getUser", "listUsers", "createUser", "deleteUser", "ghostOp"] {
        let a = OperationClassifier::new(&from_json).classify(op);
        let b = OperationClassifier::new(&from_sdl).classify(op);
        assert_eq!(a.role, b.role, "{op}");
    }
}
