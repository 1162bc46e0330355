use crate::runner::ds::array_object::array_create;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::create_native_function;
use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::object::{object_create, object_create_with_class, wrap_object, JsObjectType};
use crate::runner::ds::operations::lex_env::new_object_environment;
use crate::runner::ds::primitive_object::PrimitiveObject;
use crate::runner::ds::value::JsValue;
use crate::runner::eval_context::EvalContext;

pub const CLASS_ERROR: &str = "Error";
pub const CLASS_GLOBAL: &str = "global";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WellKnownIntrinsics {
    ArrayPrototype,
    BooleanPrototype,
    ErrorPrototype,
    FunctionPrototype,
    GeneratorPrototype,
    NumberPrototype,
    ObjectPrototype,
    RangeErrorPrototype,
    ReferenceErrorPrototype,
    StringPrototype,
    SyntaxErrorPrototype,
    ThrowTypeError,
    TypeErrorPrototype,
}

/// The intrinsic objects, global object and global scope one engine instance runs against.
pub struct CodeRealm {
    object_prototype: JsObjectType,
    function_prototype: JsObjectType,
    array_prototype: JsObjectType,
    error_prototype: JsObjectType,
    reference_error_prototype: JsObjectType,
    type_error_prototype: JsObjectType,
    range_error_prototype: JsObjectType,
    syntax_error_prototype: JsObjectType,
    boolean_prototype: JsObjectType,
    number_prototype: JsObjectType,
    string_prototype: JsObjectType,
    generator_prototype: JsObjectType,
    throw_type_error: JsObjectType,
    pub global_object: JsObjectType,
    pub global_env: JsLexEnvironmentType,
}
impl CodeRealm {
    /// Builds the bare intrinsics. Their methods are installed by `std_lib::install`.
    pub fn new() -> Result<Self, JErrorType> {
        let object_prototype = object_create(None);
        let function_prototype = create_native_function(
            Some(object_prototype.clone()),
            "",
            function_prototype_noop,
            0,
            false,
        )?;
        let error_prototype = object_create_with_class(Some(object_prototype.clone()), CLASS_ERROR);
        let error_kind_prototype =
            || object_create_with_class(Some(error_prototype.clone()), CLASS_ERROR);
        let reference_error_prototype = error_kind_prototype();
        let type_error_prototype = error_kind_prototype();
        let range_error_prototype = error_kind_prototype();
        let syntax_error_prototype = error_kind_prototype();
        let wrapper_prototype =
            |v: JsValue| wrap_object(PrimitiveObject::new(v, Some(object_prototype.clone())));
        let boolean_prototype = wrapper_prototype(JsValue::Boolean(false));
        let number_prototype = wrapper_prototype(JsValue::Number(0.0));
        let string_prototype = wrapper_prototype(JsValue::new_string(""));
        let throw_type_error = create_native_function(
            Some(function_prototype.clone()),
            "ThrowTypeError",
            throw_type_error_native,
            0,
            false,
        )?;
        throw_type_error
            .borrow_mut()
            .as_js_object_mut()
            .prevent_extensions();
        let global_object = object_create_with_class(Some(object_prototype.clone()), CLASS_GLOBAL);
        let global_env = new_object_environment(global_object.clone(), None, false);
        Ok(CodeRealm {
            array_prototype: array_create(0, Some(object_prototype.clone())),
            generator_prototype: object_create(Some(object_prototype.clone())),
            object_prototype,
            function_prototype,
            error_prototype,
            reference_error_prototype,
            type_error_prototype,
            range_error_prototype,
            syntax_error_prototype,
            boolean_prototype,
            number_prototype,
            string_prototype,
            throw_type_error,
            global_object,
            global_env,
        })
    }

    pub fn intrinsic(&self, which: WellKnownIntrinsics) -> JsObjectType {
        match which {
            WellKnownIntrinsics::ArrayPrototype => self.array_prototype.clone(),
            WellKnownIntrinsics::BooleanPrototype => self.boolean_prototype.clone(),
            WellKnownIntrinsics::ErrorPrototype => self.error_prototype.clone(),
            WellKnownIntrinsics::FunctionPrototype => self.function_prototype.clone(),
            WellKnownIntrinsics::GeneratorPrototype => self.generator_prototype.clone(),
            WellKnownIntrinsics::NumberPrototype => self.number_prototype.clone(),
            WellKnownIntrinsics::ObjectPrototype => self.object_prototype.clone(),
            WellKnownIntrinsics::RangeErrorPrototype => self.range_error_prototype.clone(),
            WellKnownIntrinsics::ReferenceErrorPrototype => {
                self.reference_error_prototype.clone()
            }
            WellKnownIntrinsics::StringPrototype => self.string_prototype.clone(),
            WellKnownIntrinsics::SyntaxErrorPrototype => self.syntax_error_prototype.clone(),
            WellKnownIntrinsics::ThrowTypeError => self.throw_type_error.clone(),
            WellKnownIntrinsics::TypeErrorPrototype => self.type_error_prototype.clone(),
        }
    }

    /// Prototype of the error objects created for `err`.
    pub fn error_prototype_for(&self, err: &JErrorType) -> JsObjectType {
        match err {
            JErrorType::ReferenceError(_) => self.reference_error_prototype.clone(),
            JErrorType::TypeError(_) => self.type_error_prototype.clone(),
            JErrorType::RangeError(_) => self.range_error_prototype.clone(),
            JErrorType::SyntaxError(_) => self.syntax_error_prototype.clone(),
            JErrorType::Thrown(_) => self.error_prototype.clone(),
        }
    }
}

fn function_prototype_noop(
    _ctx: &mut EvalContext,
    _this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Undefined)
}

fn throw_type_error_native(
    _ctx: &mut EvalContext,
    _this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Err(JErrorType::TypeError(
        "'caller', 'callee', and 'arguments' properties may not be accessed on strict mode functions or the arguments objects for calls to them".to_string(),
    ))
}
