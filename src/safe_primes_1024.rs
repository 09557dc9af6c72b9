// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! A pool of pre-generated 1024-bit safe primes for tests.
//!
//! Generating safe primes this size takes minutes apiece, which is far
//! too slow for a test suite; tests draw Paillier and range-proof moduli
//! from this pool instead. Published primes are useless for security, so
//! nothing outside `cfg(test)` may touch this module.

pub(crate) const SAFE_PRIMES: [&str; 20] = [
    "d58fad31717dfe11113df5b3eae0df2542399d0526389a184af03580c414a79310cf0d461df86f071e3ba4bd229b06d60cb2339588a6bef76bbb8ebc0ce5cb2f027249e6579c4e33fb880a3b4fa4e4e102e53bbf33f4e3cd9af17905dda7debd265c3b96a953314b1e19b2f7bf6b1485eddc0b3bb3c0fd6574392d1106350293",
    "fc51aa3bbb89413444ee86f02a66203a57cee5bf0a04367510a0b9ddaee979735f48d5f40b51d1d64f7bce623fa6f85dc6fa0cd2105562d6175ac1cac12794c0f167b4cbf8fa01bd6ddce0fa774733ec291a8ec805dbb21761d0151f31ccc3164bb1028abfdc707b8682ead1ff1dfa9904f62e72530936cf0c7563ea9468fa13",
    "ceaa84566cc9435cd0b294bdbc6b03a255073ae9910295a6a21585fcc3dc9a1d42f38c2f67594cd352f889ba72e5b4cd7cf545728d4bb29c12a924104f4178e65cc844b3cc12517a52c5a600f2dbc20b6d1440e589127178cfe25774b314df2cdd583c284935ee403b376025ca6907d9474bcd1abce0cca64632a7bf531422eb",
    "d08b0c8e0867cf9442cbaea9bf92f2fb5dd6ece2e518a54617314d0853338aa9455c98aac08b54aa54ab04d75a33ef9d43d38b09f7f0bb26b0902095dd2012e06a7f96a13dfc3384eb22f833b88ef82f473db658b6fc1627221591619abed8d07d54d4e660cfe2fa5701857344548af5e13466c121a1fec85e57f8a3f5491e03",
    "d22b7ae0504ff6a1669aff801dcadb1701ad2f01ca08464a682120495055b2c1a8fce33ac79321cb83871466d3a7c3913572395dc6fef1bf2a8799fa41464ed6d760002393b8c39faa018d8e72d2da31f881eb64c7eb71410a73e8bdac6acf835013c412f0a4382e9ef093adf11ab7cd485181189e504b36b37ec63a5d7ec297",
    "f3864d9caf00766c2723a1cf2ee735fa1cf4dda039e9d570286fdb78f18f2d1c1fcfb0daad58be6c47844b91711509bb5f2cfe3a754bc6f3df9547c96d08c8ed1f11bb10750d606a563e1d0de98281e441f49832c7c3f3a7415064ebd4f99e0f07373015bbaa528e18dbfa54180b87cb99db2fd6840ac0230484d425f34a3293",
    "c7bca7b472109514a559a00e399c905848b0c7f0041192481b91e9cf1832f559e8ae32db6602b17a806fff237b12d8570e1dc23fa36b5e1d6f09d28482adf601c12bd7d72508a9f4445eaf2bafcec7ebd9986226459d3df284b06bd2e8a7fe718c922ef5492ef40c953fe3f5b01334d3dd809568f3b503e701f4110e92e1906b",
    "faba1fac626c8bea150b6edf442b1097d273f97f11764ea6fc72f0272be1c208124ba7a69ceffb067947bddb931843e49a34fb8b9c15bb7899963b5e8d9595cce24b3ba7f0f92d80b90fbc586707e2b97d02e5c0f1d58a60599fb7f1d7c219dbb594aef97aebfa42d1032db7a5c0d032e92f547d3cb289519f2e28e8bb2ef91b",
    "b7815f772aea33f05e25d7544b59f07007e45305a8403fb14efcfb385d5343f84f135d6a443d047351ebdee2fd779ab3319186ec5ef6a4c3aeb4bbd61164dba0fe46b9cb56824903db7bd6885a81916e63215345eead32c3e1cc07f542bdb7e22696d7cf64211491e8c9f4d6af77b4ac92a0101aba419b8902d901df1dbb3f33",
    "8e858d450522bb25d101295a202a7656401fe5fd0ab9837e2fcaf6158464ea8f528551f9598808f13712f93af3a25e184db46211edb76eecd84c3db339400353c27e61e73cc8f72434a7f23b737c5111dde61010d66abb596a99ad5598855e42bfb64da6f179da1a987fd8b4b86411143a2ca04b598c9e5965f6bcdcfadb2f2f",
    "fc115b93ea0c59249aa2ae4b2cd3401d8a4d0bebbfd2fdf8308701fcc7ebccbe6863ba9717e4767828bb997c0f0490507d8a6dc3485f828099546def8609876c9065ec12a3ffee3542ae704e44877eb9b2904beb203e5086cb32836735317925f653ce63adede24d70b7eb860314cfa56b08d1b4a509b8f298531aca16ab6c13",
    "dfd2450cbfd96fc33dc318f44500d17b09ff78ea5b3f9a96addcd13d5e5a4c64c4bcc66e44552a46dbbad7ee30a29e74d4fc33f1983ad632b46327efe6436ae7c49a5e1f8010180e5019a575abc8984d7433aa83703f4e65d6ded3c430317292a4ef6b0ee825d900f06bacca7589fe43bca4036353110895a00269d6d4933343",
    "c00dd4f41f3ec0e479178ef009278b382df8561eb810cd713cad4feb38df3a2888e5706bb533cd6a893447e9f54085c130f7b9e841a467bc438e9e54adba8712dbfce3aac15c239c33ec703f901a16a605483f80f3b6bf8b6b0f0877d60778dc3e298f3dd8ad6563e2d95876b010708bc92dcddd501d664438939c15f1336923",
    "f86794907f9176c591db06c0dc4a6e397234f33ca7197d75bc5c31b655fb28bc29d78e1ed0cc01aa521513506a79a1924df50e8681f2826f100a92831cfe535ea3e8afe53f2ce53cbffbd661071cfe3f0c72a460007e97f911d0d590019c9940261c4b6b051aead0a900a0af27001433d79a73a8baf6eb97e34c0d0c77da968b",
    "89c2b7b721080c512e933973cbd31e67600eb5a5ef151cff817499bcdbcf57b1ca534113dac63c0d7c8108e03674b75263f037b61bb11e860ddff727181a3bd1c3bf60f50b4300933e7ccd935860c6a7f167116722b9c14dbc918f092e4dc225e3029400623f829cf625a71ffa8ebfc2c66774c1ba212cd3c4bf4b849393f8ff",
    "f042ce7c61653413186f0c60f5b79135793da2cd81dacf0cd895bdb896d50a7ec89998921cfe9e8567deb093cf25417ff215640e6a668d3ad039df9998d58020d93e743c920c19408a49c7c89b53ed0496660bdc86fe2a0ef375be27b10aa1162443669657dbd01cfced771cea900f9e1880a9745d1a28c009956b0f9a86b96f",
    "ec0a0290eb6839124b96766bd32b807c78aeab81cea348dd728dde7c135e52324a5c480f536a4bcaaff3b54ecbad17531658876df36a087ebf43b9cd62f261e30440599c0574bc046e983b3140d237247515c2f39a5c5e9467885e6ef3266e18220d2c2771be640e31f978eccda160b9fde7026220d913d263e3ffbe0c01cbdf",
    "caeb84b6cf8285cbd7b9247135f460ec826a6164bbb06b0e082b25c157ed817f91ebea8ade47a778731e31c1075a7b6fdb05a978e516ddedb6dabcfee66c2db919d6a1a1871015ff54da76c1987cbe25e7f3f015071c8eafa9a6de3b919d7b17879b08e774b1589c57446a44094918f6efade5d6208bc26b343e8433f747525f",
    "e04f5ec91b625c0fdf9452d8d3a1c96c63a383d695c6f5b0edc498af461f467beefc1e7c4de7c93cef6dad852dc0b276d60e731581896cb2c4301c38ab6114ffaf13b10d63fbc91e539bb3f39a5183a6333263ef3df227f3b4292fa6faa75504ee0bebe52a506feb4a65600f81d1732b3cfd2ddfc869157256a151730666e0e7",
    "be9a5a402c3dd7ffe9e88e7978fe0177daadbe0a57c69a221c368756b81eaa4d45e50026ee4f91b98ea560684e8bc41dc6acac2ed39284656878cfe64319f782ae7b881bb60b5154b0578b7a0f105fe6f4c48ea4d46fb1c7719dca6e964dd4345a9c2511aafa01d7f3938f912e02d34030e8b4d5c40cc885f7becc67e198cd5b",
];
