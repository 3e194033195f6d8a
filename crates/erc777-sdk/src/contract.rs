//! Contract interaction helpers

use bytes::Bytes;
use erc777_primitives::Address;

use crate::abi::{decode, encode_function_call, function_selector, parse_type, ParamType, Token};
use crate::SdkError;

/// Default signature of the owner-only mint entry point
pub const DEFAULT_MINT_SIGNATURE: &str = "mint(address,uint256,bytes)";

/// Contract helper for encoding/decoding function calls
#[derive(Debug, Clone)]
pub struct Contract {
    /// Contract address
    address: Address,
    /// Function definitions
    functions: Vec<FunctionDef>,
}

/// Function definition
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Function name
    pub name: String,
    /// Function signature (e.g., "operatorSend(address,address,uint256,bytes,bytes)")
    pub signature: String,
    /// Function selector (4 bytes)
    pub selector: [u8; 4],
    /// Input parameter types
    pub inputs: Vec<ParamType>,
    /// Output parameter types
    pub outputs: Vec<ParamType>,
}

impl FunctionDef {
    /// Create a new function definition
    pub fn new(
        name: impl Into<String>,
        signature: impl Into<String>,
        inputs: Vec<ParamType>,
        outputs: Vec<ParamType>,
    ) -> Self {
        let signature = signature.into();
        let selector = function_selector(&signature);
        Self {
            name: name.into(),
            signature,
            selector,
            inputs,
            outputs,
        }
    }

    /// Build a definition from a canonical signature such as
    /// `mint(address,uint256,bytes)`.
    pub fn from_signature(signature: &str, outputs: Vec<ParamType>) -> Result<Self, SdkError> {
        let signature = signature.trim();
        let (name, rest) = signature
            .split_once('(')
            .ok_or_else(|| SdkError::AbiEncode(format!("Malformed signature: {}", signature)))?;
        let params = rest
            .strip_suffix(')')
            .ok_or_else(|| SdkError::AbiEncode(format!("Malformed signature: {}", signature)))?;
        if name.is_empty() {
            return Err(SdkError::AbiEncode(format!("Malformed signature: {}", signature)));
        }

        let inputs = if params.is_empty() {
            Vec::new()
        } else {
            params.split(',').map(parse_type).collect::<Result<Vec<_>, _>>()?
        };
        let canonical = format!(
            "{}({})",
            name,
            inputs.iter().map(ParamType::canonical).collect::<Vec<_>>().join(",")
        );
        Ok(Self::new(name, canonical, inputs, outputs))
    }
}

impl Contract {
    /// Create a new contract helper
    pub fn new(address: Address) -> Self {
        Self {
            address,
            functions: Vec::new(),
        }
    }

    /// Get the contract address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Add a function definition
    pub fn add_function(&mut self, function: FunctionDef) {
        self.functions.push(function);
    }

    /// Get a function by name
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Encode a function call
    pub fn encode_call(&self, function_name: &str, args: &[Token]) -> Result<Bytes, SdkError> {
        let function = self
            .function(function_name)
            .ok_or_else(|| SdkError::AbiEncode(format!("Unknown function: {}", function_name)))?;

        if args.len() != function.inputs.len() {
            return Err(SdkError::AbiEncode(format!(
                "Expected {} arguments, got {}",
                function.inputs.len(),
                args.len()
            )));
        }
        for (index, (expected, arg)) in function.inputs.iter().zip(args).enumerate() {
            let compatible = match (expected, arg) {
                (ParamType::Uint(_), Token::Uint(_)) => true,
                (expected, arg) => *expected == arg.type_of(),
            };
            if !compatible {
                return Err(SdkError::AbiEncode(format!(
                    "Argument {} of {}: expected {}, got {}",
                    index,
                    function.signature,
                    expected.canonical(),
                    arg.type_of().canonical()
                )));
            }
        }

        Ok(Bytes::from(encode_function_call(function.selector, args)))
    }

    /// Decode function output
    pub fn decode_output(&self, function_name: &str, data: &[u8]) -> Result<Vec<Token>, SdkError> {
        let function = self
            .function(function_name)
            .ok_or_else(|| SdkError::AbiDecode(format!("Unknown function: {}", function_name)))?;

        decode(&function.outputs, data)
    }
}

/// Builder for creating contract interfaces
pub struct ContractBuilder {
    address: Address,
    functions: Vec<FunctionDef>,
}

impl ContractBuilder {
    /// Create a new contract builder
    pub fn new(address: Address) -> Self {
        Self {
            address,
            functions: Vec::new(),
        }
    }

    /// Add a function
    pub fn function(
        mut self,
        name: &str,
        signature: &str,
        inputs: Vec<ParamType>,
        outputs: Vec<ParamType>,
    ) -> Self {
        self.functions
            .push(FunctionDef::new(name, signature, inputs, outputs));
        self
    }

    /// Add a prebuilt definition
    pub fn with_function(mut self, function: FunctionDef) -> Self {
        self.functions.push(function);
        self
    }

    /// Build the contract
    pub fn build(self) -> Contract {
        Contract {
            address: self.address,
            functions: self.functions,
        }
    }
}

/// ERC-777 interface restricted to what the operator suite drives.
///
/// The mint entry point is not part of the standard; its signature is
/// registered under the name `mint`.
pub fn erc777(address: Address, mint_signature: &str) -> Result<Contract, SdkError> {
    let mint = FunctionDef::from_signature(mint_signature, vec![])?;
    let mint = FunctionDef { name: "mint".to_string(), ..mint };

    Ok(ContractBuilder::new(address)
        .function("name", "name()", vec![], vec![ParamType::String])
        .function("symbol", "symbol()", vec![], vec![ParamType::String])
        .function("granularity", "granularity()", vec![], vec![ParamType::Uint(256)])
        .function("totalSupply", "totalSupply()", vec![], vec![ParamType::Uint(256)])
        .function(
            "balanceOf",
            "balanceOf(address)",
            vec![ParamType::Address],
            vec![ParamType::Uint(256)],
        )
        .function(
            "isOperatorFor",
            "isOperatorFor(address,address)",
            vec![ParamType::Address, ParamType::Address],
            vec![ParamType::Bool],
        )
        .function(
            "authorizeOperator",
            "authorizeOperator(address)",
            vec![ParamType::Address],
            vec![],
        )
        .function(
            "revokeOperator",
            "revokeOperator(address)",
            vec![ParamType::Address],
            vec![],
        )
        .function(
            "operatorSend",
            "operatorSend(address,address,uint256,bytes,bytes)",
            vec![
                ParamType::Address,
                ParamType::Address,
                ParamType::Uint(256),
                ParamType::Bytes,
                ParamType::Bytes,
            ],
            vec![],
        )
        .with_function(mint)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use erc777_primitives::U256;

    fn token() -> Contract {
        erc777(Address::from_low_u64(0xabc), DEFAULT_MINT_SIGNATURE).unwrap()
    }

    #[test]
    fn test_erc777_interface() {
        let contract = token();
        for name in [
            "name",
            "symbol",
            "granularity",
            "totalSupply",
            "balanceOf",
            "isOperatorFor",
            "authorizeOperator",
            "revokeOperator",
            "operatorSend",
            "mint",
        ] {
            assert!(contract.function(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_encode_balance_of() {
        let owner = Address::from_low_u64(1);
        let data = token()
            .encode_call("balanceOf", &[Token::Address(owner)])
            .unwrap();

        assert_eq!(&data[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(data.len(), 36);
    }

    #[test]
    fn test_encode_operator_send() {
        let data = token()
            .encode_call(
                "operatorSend",
                &[
                    Token::Address(Address::from_low_u64(1)),
                    Token::Address(Address::from_low_u64(2)),
                    Token::Uint(U256::from(1000)),
                    Token::Bytes(vec![]),
                    Token::Bytes(vec![]),
                ],
            )
            .unwrap();

        // selector + 5 head words + 2 empty tails
        assert_eq!(data.len(), 4 + 5 * 32 + 2 * 32);
    }

    #[test]
    fn test_decode_is_operator_for() {
        let mut data = [0u8; 32];
        data[31] = 1;
        let tokens = token().decode_output("isOperatorFor", &data).unwrap();
        assert_eq!(tokens, vec![Token::Bool(true)]);
    }

    #[test]
    fn test_unknown_function() {
        assert!(token().encode_call("transferFrom", &[]).is_err());
    }

    #[test]
    fn test_wrong_arg_count() {
        let result = token().encode_call("operatorSend", &[Token::Address(Address::ZERO)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_arg_type() {
        let result = token().encode_call("authorizeOperator", &[Token::Bool(true)]);
        assert!(matches!(result, Err(SdkError::AbiEncode(_))));
    }

    #[test]
    fn test_mint_signature_is_configurable() {
        let contract = erc777(Address::ZERO, "mint(address, uint)").unwrap();
        let mint = contract.function("mint").unwrap();
        assert_eq!(mint.signature, "mint(address,uint256)");
        assert_eq!(mint.inputs, vec![ParamType::Address, ParamType::Uint(256)]);
    }

    #[test]
    fn test_from_signature_rejects_malformed() {
        assert!(FunctionDef::from_signature("mint", vec![]).is_err());
        assert!(FunctionDef::from_signature("(address)", vec![]).is_err());
        assert!(FunctionDef::from_signature("mint(address", vec![]).is_err());
    }

    #[test]
    fn test_from_signature_no_params() {
        let f = FunctionDef::from_signature("totalSupply()", vec![ParamType::Uint(256)]).unwrap();
        assert!(f.inputs.is_empty());
        assert_eq!(f.selector, function_selector("totalSupply()"));
    }
}
